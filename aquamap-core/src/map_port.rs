//! Port trait for the map rendering/clustering capability, so the engine can
//! drive a real map, a console, or a test fake without depending on any of them.

use crate::{
    aggregation::{ClusterStyle, PointFeature, PointSet},
    session::DraftPin,
};
use aquamap_schemas::event::FlyTo;

/// What the engine needs from a map. Every call is fire-and-forget: camera
/// animations are not awaited and a newer `fly_to` supersedes an older one.
pub trait MapSurface {
    /// Current zoom level of the viewport.
    fn zoom(&self) -> f64;

    /// Animate the viewport to a new center and zoom.
    fn fly_to(&mut self, command: FlyTo);

    /// Replace the point/cluster layer.
    fn render_points(&mut self, points: &PointSet, style: &ClusterStyle);

    /// Show the draft pin with its coordinate popup, or hide it with `None`.
    fn show_draft_pin(&mut self, pin: Option<&DraftPin>);

    /// Show the popup of a selected point, or close it with `None`.
    fn show_selection(&mut self, feature: Option<&PointFeature>);
}
