//! The canonical list of markers for one water-body category.

use crate::{
    error::{StoreError, ValidationError},
    validation,
};
use aquamap_schemas::{
    draft::MarkerDraft,
    marker::{Marker, MarkerFields, MarkerId},
};
use chrono::Utc;
use std::collections::HashSet;
use tracing::debug;

const MANUAL_PREFIX: &str = "m";
const SAMPLE_PREFIX: &str = "sample";

/// Owns the markers of a single category.
///
/// Every marker added or updated through `add*`/`update*` has passed the full
/// validation rule set against the markers already present. Markers inserted
/// with [`MarkerStore::bulk_add`] are synthetic samples: they skip the spacing
/// rule and are tracked so they can be removed as a set.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    sample_ids: HashSet<MarkerId>,
    next_seq: u64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Markers in insertion order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn get(&self, id: &MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| &m.id == id)
    }

    pub fn contains(&self, id: &MarkerId) -> bool {
        self.get(id).is_some()
    }

    /// Ids currently tagged as generated sample data.
    pub fn sample_ids(&self) -> &HashSet<MarkerId> {
        &self.sample_ids
    }

    pub fn is_sample(&self, id: &MarkerId) -> bool {
        self.sample_ids.contains(id)
    }

    /// Validates a form and appends it as a new marker.
    pub fn add(&mut self, draft: &MarkerDraft) -> Result<Marker, ValidationError> {
        let fields = validation::validate(draft, &self.markers, None)?;
        Ok(self.push(fields, MANUAL_PREFIX))
    }

    /// Appends already-parsed fields, applying the same rules as [`MarkerStore::add`].
    pub fn add_fields(&mut self, fields: MarkerFields) -> Result<Marker, ValidationError> {
        validation::check_fields(&fields)?;
        validation::check_spacing(fields.coordinates(), &self.markers, None)?;
        Ok(self.push(fields, MANUAL_PREFIX))
    }

    /// Replaces the mutable fields of `id` with the validated form, keeping its
    /// id and creation timestamp. The marker itself is excluded from the
    /// spacing check.
    pub fn update(&mut self, id: &MarkerId, draft: &MarkerDraft) -> Result<Marker, StoreError> {
        if !self.contains(id) {
            return Err(StoreError::NotFound(id.clone()));
        }
        let fields = validation::validate(draft, &self.markers, Some(id))?;
        self.replace(id, fields)
    }

    pub fn update_fields(&mut self, id: &MarkerId, fields: MarkerFields) -> Result<Marker, StoreError> {
        if !self.contains(id) {
            return Err(StoreError::NotFound(id.clone()));
        }
        validation::check_fields(&fields)?;
        validation::check_spacing(fields.coordinates(), &self.markers, Some(id))?;
        self.replace(id, fields)
    }

    /// Removes `id` if present. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &MarkerId) -> Option<Marker> {
        let index = self.markers.iter().position(|m| &m.id == id)?;
        self.sample_ids.remove(id);
        debug!(marker = %id, "removed marker");
        Some(self.markers.remove(index))
    }

    /// Inserts generated sample markers and tags their ids.
    ///
    /// Samples are exempt from the spacing rule, both among themselves and
    /// against existing markers, but must still carry valid coordinates and
    /// parameters. Nothing is inserted if any of them is invalid.
    pub fn bulk_add(&mut self, batch: Vec<MarkerFields>) -> Result<Vec<Marker>, ValidationError> {
        for fields in &batch {
            validation::check_fields(fields)?;
        }
        let added: Vec<Marker> = batch
            .into_iter()
            .map(|fields| self.push(fields, SAMPLE_PREFIX))
            .collect();
        self.sample_ids.extend(added.iter().map(|m| m.id.clone()));
        debug!(count = added.len(), "bulk added sample markers");
        Ok(added)
    }

    /// Removes every marker whose id is in `ids` and returns how many were removed.
    pub fn bulk_remove(&mut self, ids: &HashSet<MarkerId>) -> usize {
        let before = self.markers.len();
        self.markers.retain(|m| !ids.contains(&m.id));
        self.sample_ids.retain(|id| !ids.contains(id));
        before - self.markers.len()
    }

    /// Removes all markers still tagged as samples.
    pub fn remove_samples(&mut self) -> usize {
        let ids = std::mem::take(&mut self.sample_ids);
        self.bulk_remove(&ids)
    }

    fn push(&mut self, fields: MarkerFields, prefix: &str) -> Marker {
        let marker = Marker {
            id: self.next_id(prefix),
            fields,
            timestamp: Utc::now(),
        };
        self.markers.push(marker.clone());
        marker
    }

    fn replace(&mut self, id: &MarkerId, fields: MarkerFields) -> Result<Marker, StoreError> {
        let marker = self
            .markers
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        marker.fields = fields;
        Ok(marker.clone())
    }

    fn next_id(&mut self, prefix: &str) -> MarkerId {
        loop {
            self.next_seq += 1;
            let id = MarkerId::new(format!("{}-{}", prefix, self.next_seq));
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

impl<'a> IntoIterator for &'a MarkerStore {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquamap_schemas::{geo::Coordinates, parameter::Parameter};

    fn draft_at(latitude: f64, longitude: f64) -> MarkerDraft {
        let mut draft = MarkerDraft::at(Coordinates::new(latitude, longitude));
        draft.turbidity = "5.2".into();
        draft.ph = "7.0".into();
        draft.temperature = "25.5".into();
        draft.bod = "3.0".into();
        draft
    }

    #[test]
    fn add_assigns_distinct_ids() {
        let mut store = MarkerStore::new();
        let a = store.add(&draft_at(28.0, 77.0)).unwrap();
        let b = store.add(&draft_at(28.1, 77.0)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&a.id), Some(&a));
    }

    #[test]
    fn rejected_add_leaves_store_unchanged() {
        let mut store = MarkerStore::new();
        store.add(&draft_at(28.0, 77.0)).unwrap();
        let before = store.markers().to_vec();
        let mut bad = draft_at(29.0, 77.0);
        bad.ph = "acid".into();
        assert_eq!(
            store.add(&bad),
            Err(ValidationError::InvalidParameter(Parameter::Ph))
        );
        assert_eq!(store.markers(), before.as_slice());
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = MarkerStore::new();
        let id = MarkerId::new("m-42");
        assert_eq!(
            store.update(&id, &draft_at(1.0, 1.0)),
            Err(StoreError::NotFound(id))
        );
    }

    #[test]
    fn update_keeps_identity_and_checks_other_markers() {
        let mut store = MarkerStore::new();
        let a = store.add(&draft_at(28.0, 77.0)).unwrap();
        let b = store.add(&draft_at(28.1, 77.0)).unwrap();

        let moved = store.update(&a.id, &draft_at(28.0001, 77.0)).unwrap();
        assert_eq!(moved.id, a.id);
        assert_eq!(moved.timestamp, a.timestamp);
        assert_eq!(moved.fields.latitude, 28.0001);

        let onto_b = store.update(&a.id, &draft_at(28.1, 77.0));
        assert!(matches!(
            onto_b,
            Err(StoreError::Validation(ValidationError::TooClose { ref nearest, .. })) if *nearest == b.id
        ));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = MarkerStore::new();
        let a = store.add(&draft_at(28.0, 77.0)).unwrap();
        assert!(store.remove(&a.id).is_some());
        assert!(store.remove(&a.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn samples_skip_spacing_and_remove_as_a_set() {
        let mut store = MarkerStore::new();
        let manual = store.add(&draft_at(28.0, 77.0)).unwrap();
        let fields = crate::validation::parse_draft(&draft_at(28.0, 77.0)).unwrap();
        let samples = store.bulk_add(vec![fields.clone(), fields]).unwrap();
        assert_eq!(store.len(), 3);
        assert!(samples.iter().all(|m| store.is_sample(&m.id)));
        assert!(samples.iter().all(|m| m.id.as_str().starts_with("sample-")));

        assert_eq!(store.remove_samples(), 2);
        assert_eq!(store.markers(), &[manual]);
        assert!(store.sample_ids().is_empty());
    }

    #[test]
    fn invalid_sample_batch_inserts_nothing() {
        let mut store = MarkerStore::new();
        let mut fields = crate::validation::parse_draft(&draft_at(28.0, 77.0)).unwrap();
        let good = fields.clone();
        fields.latitude = 123.0;
        assert_eq!(
            store.bulk_add(vec![good, fields]),
            Err(ValidationError::InvalidCoordinates)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn removing_a_sample_untags_it() {
        let mut store = MarkerStore::new();
        let fields = crate::validation::parse_draft(&draft_at(28.0, 77.0)).unwrap();
        let samples = store.bulk_add(vec![fields]).unwrap();
        store.remove(&samples[0].id);
        assert!(store.sample_ids().is_empty());
    }
}
