use crate::{geo::Coordinates, marker::MarkerId};
use serde::{Deserialize, Serialize};

/// A raw interaction emitted by the map capability, already normalized to
/// coordinates or marker ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    /// Right-click / context menu on the map surface.
    ContextMenu { coordinates: Coordinates },
    /// Plain left click on empty map surface.
    Click { coordinates: Coordinates },
    /// Click on an individual, non-clustered marker.
    MarkerClick { marker_id: MarkerId },
    /// Click on a single point resolved out of a cluster layer.
    PointClick {
        marker_id: MarkerId,
        coordinates: Coordinates,
    },
    /// Click on an aggregate cluster.
    ClusterClick {
        cluster_id: u64,
        coordinates: Coordinates,
        point_count: usize,
    },
}

/// Fire-and-forget camera animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlyTo {
    pub center: Coordinates,
    pub zoom: f64,
    pub duration_ms: u64,
}
