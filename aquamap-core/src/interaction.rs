//! Translates raw map events into session transitions and camera commands.

use crate::{
    aggregation::PointFeature,
    map_port::MapSurface,
    session::{DraftPin, EditSession, Selection},
    store::MarkerStore,
};
use aquamap_schemas::{event::FlyTo, event::MapEvent, geo::Coordinates};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Camera parameters for marker and cluster clicks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Zoom level when flying to a single marker.
    pub marker_zoom: f64,
    pub marker_fly_ms: u64,
    /// Zoom increment applied on a cluster click.
    pub cluster_zoom_step: f64,
    /// Cluster clicks never zoom past this level.
    pub cluster_max_zoom: f64,
    pub cluster_fly_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            marker_zoom: 14.0,
            marker_fly_ms: 1500,
            cluster_zoom_step: 2.0,
            cluster_max_zoom: 14.0,
            cluster_fly_ms: 1000,
        }
    }
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    PinPlaced(DraftPin),
    FlewTo(FlyTo),
    Selected { selection: Selection, camera: FlyTo },
    ZoomedToCluster(FlyTo),
    /// The event needs no reaction (plain click, or a stale marker id).
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct MapInteraction {
    config: InteractionConfig,
}

impl MapInteraction {
    pub fn new(config: InteractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn handle(
        &self,
        event: &MapEvent,
        session: &mut EditSession,
        store: &MarkerStore,
        surface: &mut dyn MapSurface,
    ) -> InteractionOutcome {
        match event {
            MapEvent::ContextMenu { coordinates } => {
                let pin = session.place_pin(*coordinates);
                surface.show_selection(None);
                surface.show_draft_pin(Some(&pin));
                InteractionOutcome::PinPlaced(pin)
            }
            // Left click is reserved for marker and cluster selection.
            MapEvent::Click { .. } => InteractionOutcome::Ignored,
            MapEvent::MarkerClick { marker_id } => match store.get(marker_id) {
                Some(marker) => {
                    let camera = self.marker_camera(marker.coordinates());
                    surface.fly_to(camera);
                    InteractionOutcome::FlewTo(camera)
                }
                None => {
                    warn!(marker = %marker_id, "click on unknown marker");
                    InteractionOutcome::Ignored
                }
            },
            MapEvent::PointClick {
                marker_id,
                coordinates,
            } => match store.get(marker_id) {
                Some(marker) => {
                    let selection = Selection {
                        marker_id: marker.id.clone(),
                        coordinates: *coordinates,
                    };
                    session.select(selection.clone());
                    let camera = self.marker_camera(marker.coordinates());
                    surface.fly_to(camera);
                    surface.show_selection(Some(&PointFeature::from_marker(marker)));
                    InteractionOutcome::Selected { selection, camera }
                }
                None => {
                    warn!(marker = %marker_id, "cluster point no longer in store");
                    InteractionOutcome::Ignored
                }
            },
            MapEvent::ClusterClick {
                cluster_id,
                coordinates,
                point_count,
            } => {
                let camera = self.cluster_camera(*coordinates, surface.zoom());
                debug!(cluster_id, point_count, zoom = camera.zoom, "zooming into cluster");
                surface.fly_to(camera);
                InteractionOutcome::ZoomedToCluster(camera)
            }
        }
    }

    pub fn marker_camera(&self, center: Coordinates) -> FlyTo {
        FlyTo {
            center,
            zoom: self.config.marker_zoom,
            duration_ms: self.config.marker_fly_ms,
        }
    }

    pub fn cluster_camera(&self, center: Coordinates, current_zoom: f64) -> FlyTo {
        FlyTo {
            center,
            zoom: (current_zoom + self.config.cluster_zoom_step).min(self.config.cluster_max_zoom),
            duration_ms: self.config.cluster_fly_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_zoom_is_capped() {
        let interaction = MapInteraction::default();
        let center = Coordinates::new(1.0, 2.0);
        assert_eq!(interaction.cluster_camera(center, 5.0).zoom, 7.0);
        assert_eq!(interaction.cluster_camera(center, 13.0).zoom, 14.0);
        assert_eq!(interaction.cluster_camera(center, 16.0).zoom, 14.0);
        assert_eq!(interaction.cluster_camera(center, 5.0).duration_ms, 1000);
    }

    #[test]
    fn marker_camera_uses_fixed_zoom_and_duration() {
        let interaction = MapInteraction::default();
        let camera = interaction.marker_camera(Coordinates::new(1.0, 2.0));
        assert_eq!(camera.zoom, 14.0);
        assert_eq!(camera.duration_ms, 1500);
        assert_eq!(camera.center, Coordinates::new(1.0, 2.0));
    }
}
