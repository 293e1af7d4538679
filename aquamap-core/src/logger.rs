use crate::error::AquamapError;
use aquamap_schemas::{
    category::WaterBody,
    marker::{Marker, MarkerColor, MarkerFields, MarkerId},
};
use chrono::{DateTime, Utc};
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// One marker as a flat CSV row. This is the file format produced by
/// `export_markers` and sent through the admin upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub id: String,
    pub category: WaterBody,
    pub latitude: f64,
    pub longitude: f64,
    pub color: Option<MarkerColor>,
    pub turbidity: f64,
    pub ph: f64,
    pub temperature: f64,
    pub bod: f64,
    pub conductivity: Option<f64>,
    pub aod: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl MarkerRecord {
    pub fn from_marker(category: WaterBody, marker: &Marker) -> Self {
        let fields = &marker.fields;
        Self {
            id: marker.id.to_string(),
            category,
            latitude: fields.latitude,
            longitude: fields.longitude,
            color: fields.color,
            turbidity: fields.turbidity,
            ph: fields.ph,
            temperature: fields.temperature,
            bod: fields.bod,
            conductivity: fields.conductivity,
            aod: fields.aod,
            timestamp: marker.timestamp,
        }
    }

    /// The stored marker this row describes, keeping its original id.
    pub fn to_marker(&self) -> Marker {
        Marker {
            id: MarkerId::new(self.id.clone()),
            fields: self.fields(),
            timestamp: self.timestamp,
        }
    }

    pub fn fields(&self) -> MarkerFields {
        MarkerFields {
            latitude: self.latitude,
            longitude: self.longitude,
            color: self.color,
            turbidity: self.turbidity,
            ph: self.ph,
            temperature: self.temperature,
            bod: self.bod,
            conductivity: self.conductivity,
            aod: self.aod,
        }
    }
}

/// Kind of committed store change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    Add,
    Update,
    Remove,
    BulkAdd,
    BulkRemove,
}

#[derive(Debug, Serialize)]
struct MutationEntry<'a> {
    logged_at: DateTime<Utc>,
    mutation: Mutation,
    category: WaterBody,
    marker_id: &'a str,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Appends one CSV row per committed store mutation.
pub struct MutationLogger {
    writer: Writer<fs::File>,
}

impl MutationLogger {
    pub fn new(path: &str) -> Result<Self, io::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_marker(
        &mut self,
        mutation: Mutation,
        category: WaterBody,
        marker: &Marker,
    ) -> Result<(), anyhow::Error> {
        self.write(MutationEntry {
            logged_at: Utc::now(),
            mutation,
            category,
            marker_id: marker.id.as_str(),
            latitude: Some(marker.fields.latitude),
            longitude: Some(marker.fields.longitude),
        })
    }

    pub fn log_removal(
        &mut self,
        mutation: Mutation,
        category: WaterBody,
        id: &MarkerId,
    ) -> Result<(), anyhow::Error> {
        self.write(MutationEntry {
            logged_at: Utc::now(),
            mutation,
            category,
            marker_id: id.as_str(),
            latitude: None,
            longitude: None,
        })
    }

    fn write(&mut self, entry: MutationEntry<'_>) -> Result<(), anyhow::Error> {
        self.writer.serialize(entry)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes `markers` to a CSV file and returns the number of rows written.
pub fn export_markers(path: &Path, category: WaterBody, markers: &[Marker]) -> Result<usize, AquamapError> {
    let display = path.display().to_string();
    let mut writer =
        Writer::from_path(path).map_err(|e| AquamapError::CsvError(display.clone(), e))?;
    for marker in markers {
        writer
            .serialize(MarkerRecord::from_marker(category, marker))
            .map_err(|e| AquamapError::CsvError(display.clone(), e))?;
    }
    writer
        .flush()
        .map_err(|e| AquamapError::FileIO(display, e))?;
    Ok(markers.len())
}

/// Reads a CSV file written by [`export_markers`].
pub fn read_markers(path: &Path) -> Result<Vec<MarkerRecord>, AquamapError> {
    let display = path.display().to_string();
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| AquamapError::CsvError(display.clone(), e))?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: MarkerRecord = result.map_err(|e| AquamapError::CsvError(display.clone(), e))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MarkerStore;
    use aquamap_schemas::{draft::MarkerDraft, geo::Coordinates, parameter::Parameter};

    fn store() -> MarkerStore {
        let mut store = MarkerStore::new();
        let mut draft = MarkerDraft::at(Coordinates::new(28.6139, 77.209));
        draft.color = Some(MarkerColor::Yellow);
        draft.turbidity = "5.2".into();
        draft.ph = "7".into();
        draft.temperature = "25.5".into();
        draft.bod = "3".into();
        draft.toggle(Parameter::Conductivity);
        draft.conductivity = "480".into();
        store.add(&draft).unwrap();

        let mut plain = MarkerDraft::at(Coordinates::new(28.7, 77.3));
        plain.turbidity = "1".into();
        plain.ph = "8".into();
        plain.temperature = "20".into();
        plain.bod = "2".into();
        store.add(&plain).unwrap();
        store
    }

    #[test]
    fn exported_markers_read_back_with_optionals_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markers.csv");
        let store = store();

        assert_eq!(export_markers(&path, WaterBody::Lake, store.markers()).unwrap(), 2);
        let records = read_markers(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, WaterBody::Lake);
        assert_eq!(records[0].fields(), store.markers()[0].fields);
        assert_eq!(records[1].fields(), store.markers()[1].fields);
        assert_eq!(records[1].conductivity, None);
        assert_eq!(records[1].color, None);
        assert_eq!(records[0].to_marker().id, store.markers()[0].id);
    }

    #[test]
    fn mutation_log_writes_a_row_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mutations.csv");
        let store = store();
        {
            let mut logger = MutationLogger::new(path.to_str().unwrap()).unwrap();
            logger
                .log_marker(Mutation::Add, WaterBody::Ponds, &store.markers()[0])
                .unwrap();
            logger
                .log_removal(Mutation::Remove, WaterBody::Ponds, &store.markers()[0].id)
                .unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("logged_at,mutation,category,marker_id"));
        assert!(lines[1].contains(",add,ponds,m-1,28.6139,77.209"));
        assert!(lines[2].ends_with(",remove,ponds,m-1,,"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = read_markers(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
