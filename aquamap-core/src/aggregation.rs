//! Clustering-ready view of a marker store.
//!
//! The view is recomputed from scratch on every store change. How points are
//! grouped into clusters is decided by the map capability; this module only
//! supplies per-point attributes and the [`ClusterStyle`] handed to it.

use crate::store::MarkerStore;
use aquamap_schemas::{
    geo::Coordinates,
    marker::{Marker, MarkerColor, MarkerId},
    parameter::Parameter,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Rendering hints for the cluster layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterStyle {
    /// Cluster radius in screen pixels.
    pub radius_px: u32,
    /// Zoom level above which points are no longer clustered.
    pub max_zoom: f64,
    /// Color clusters by the most frequent palette index among their points.
    pub color_by_majority: bool,
    /// Fallback color for points without a color property.
    pub point_color: String,
}

impl Default for ClusterStyle {
    fn default() -> Self {
        Self {
            radius_px: 60,
            max_zoom: 14.0,
            color_by_majority: true,
            point_color: MarkerColor::Blue.hex().to_string(),
        }
    }
}

impl ClusterStyle {
    /// Palette hex values in palette-index order.
    pub fn palette(&self) -> [&'static str; 4] {
        MarkerColor::ALL.map(MarkerColor::hex)
    }
}

/// One renderable point with everything its popup needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
    pub id: MarkerId,
    pub coordinates: Coordinates,
    pub color: MarkerColor,
    pub turbidity: f64,
    pub ph: f64,
    pub temperature: f64,
    pub bod: f64,
    pub conductivity: Option<f64>,
    pub aod: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PointFeature {
    pub fn from_marker(marker: &Marker) -> Self {
        let fields = &marker.fields;
        Self {
            id: marker.id.clone(),
            coordinates: marker.coordinates(),
            color: marker.display_color(),
            turbidity: fields.turbidity,
            ph: fields.ph,
            temperature: fields.temperature,
            bod: fields.bod,
            conductivity: fields.conductivity,
            aod: fields.aod,
            timestamp: marker.timestamp,
        }
    }

    pub fn color_index(&self) -> u8 {
        self.color.index()
    }

    pub fn color_hex(&self) -> &'static str {
        self.color.hex()
    }

    /// Label/value rows for the point popup; absent optional parameters are skipped.
    pub fn popup_rows(&self) -> Vec<(&'static str, String)> {
        let values = [
            (Parameter::Turbidity, Some(self.turbidity)),
            (Parameter::Ph, Some(self.ph)),
            (Parameter::Temperature, Some(self.temperature)),
            (Parameter::Bod, Some(self.bod)),
            (Parameter::Conductivity, self.conductivity),
            (Parameter::Aod, self.aod),
        ];
        values
            .into_iter()
            .filter_map(|(parameter, value)| {
                let value = value?;
                let text = match (parameter, parameter.unit()) {
                    (Parameter::Temperature, _) => format!("{}°C", value),
                    (_, Some(unit)) => format!("{} {}", value, unit),
                    (_, None) => value.to_string(),
                };
                Some((parameter.label(), text))
            })
            .collect()
    }

    /// A GeoJSON `Feature` with `[lng, lat]` geometry.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": self.coordinates.lng_lat(),
            },
            "properties": {
                "id": self.id,
                "color": self.color,
                "colorIndex": self.color_index(),
                "colorHex": self.color_hex(),
                "turbidity": self.turbidity,
                "ph": self.ph,
                "temperature": self.temperature,
                "bod": self.bod,
                "conductivity": self.conductivity,
                "aod": self.aod,
                "timestamp": self.timestamp.to_rfc3339(),
            },
        })
    }
}

/// The point-set derived from one store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    features: Vec<PointFeature>,
}

impl PointSet {
    pub fn from_markers<'a, I>(markers: I) -> Self
    where
        I: IntoIterator<Item = &'a Marker>,
    {
        Self {
            features: markers.into_iter().map(PointFeature::from_marker).collect(),
        }
    }

    pub fn from_store(store: &MarkerStore) -> Self {
        Self::from_markers(store)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[PointFeature] {
        &self.features
    }

    pub fn get(&self, id: &MarkerId) -> Option<&PointFeature> {
        self.features.iter().find(|f| &f.id == id)
    }

    /// Number of points per palette color, in palette order.
    pub fn color_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for feature in &self.features {
            counts[feature.color_index() as usize] += 1;
        }
        counts
    }

    /// Maps a clicked point back to the marker it was derived from.
    pub fn resolve<'a>(&self, store: &'a MarkerStore, id: &MarkerId) -> Option<&'a Marker> {
        self.get(id).and_then(|feature| store.get(&feature.id))
    }

    /// A GeoJSON `FeatureCollection` of all points.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.features.iter().map(PointFeature::to_geojson).collect::<Vec<_>>(),
        })
    }
}
