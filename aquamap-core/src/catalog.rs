//! One independent marker store per water-body category.

use crate::store::MarkerStore;
use aquamap_schemas::category::WaterBody;
use tracing::info;

/// Maps each category to its own [`MarkerStore`] and tracks which one is
/// active. Switching never merges stores or validates across them.
#[derive(Debug, Clone)]
pub struct Catalog {
    stores: [MarkerStore; 3],
    active: WaterBody,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(WaterBody::default())
    }
}

impl Catalog {
    pub fn new(active: WaterBody) -> Self {
        Self {
            stores: Default::default(),
            active,
        }
    }

    pub fn active_category(&self) -> WaterBody {
        self.active
    }

    /// Makes `category` the active store and returns whether it changed.
    pub fn switch(&mut self, category: WaterBody) -> bool {
        if self.active == category {
            return false;
        }
        info!(from = %self.active, to = %category, "switching water-body category");
        self.active = category;
        true
    }

    pub fn active(&self) -> &MarkerStore {
        self.store(self.active)
    }

    pub fn active_mut(&mut self) -> &mut MarkerStore {
        self.store_mut(self.active)
    }

    pub fn store(&self, category: WaterBody) -> &MarkerStore {
        &self.stores[slot(category)]
    }

    pub fn store_mut(&mut self, category: WaterBody) -> &mut MarkerStore {
        &mut self.stores[slot(category)]
    }

    /// Total number of markers across all categories.
    pub fn total_len(&self) -> usize {
        self.stores.iter().map(MarkerStore::len).sum()
    }
}

fn slot(category: WaterBody) -> usize {
    match category {
        WaterBody::Ponds => 0,
        WaterBody::River => 1,
        WaterBody::Lake => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquamap_schemas::{draft::MarkerDraft, geo::Coordinates};

    fn draft() -> MarkerDraft {
        let mut draft = MarkerDraft::at(Coordinates::new(28.6139, 77.2090));
        draft.turbidity = "1".into();
        draft.ph = "7".into();
        draft.temperature = "20".into();
        draft.bod = "2".into();
        draft
    }

    #[test]
    fn stores_are_independent() {
        let mut catalog = Catalog::new(WaterBody::Ponds);
        catalog.active_mut().add(&draft()).unwrap();

        assert!(catalog.switch(WaterBody::Lake));
        assert!(catalog.active().is_empty());
        // Same point in another category is not checked for spacing.
        catalog.active_mut().add(&draft()).unwrap();

        assert_eq!(catalog.store(WaterBody::Ponds).len(), 1);
        assert_eq!(catalog.store(WaterBody::Lake).len(), 1);
        assert_eq!(catalog.store(WaterBody::River).len(), 0);
        assert_eq!(catalog.total_len(), 2);
    }

    #[test]
    fn switching_to_the_active_category_is_a_no_op() {
        let mut catalog = Catalog::new(WaterBody::River);
        assert!(!catalog.switch(WaterBody::River));
        assert_eq!(catalog.active_category(), WaterBody::River);
    }
}
