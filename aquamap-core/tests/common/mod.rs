#![allow(dead_code)]

use aquamap_core::{
    aggregation::{ClusterStyle, PointFeature, PointSet},
    map_port::MapSurface,
    session::DraftPin,
};
use aquamap_schemas::{
    draft::MarkerDraft,
    event::FlyTo,
    geo::Coordinates,
    marker::MarkerId,
};

/// Map fake that records every command it receives.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub zoom: f64,
    pub flights: Vec<FlyTo>,
    /// Point count of each render, in order.
    pub renders: Vec<usize>,
    pub pin: Option<DraftPin>,
    pub popup: Option<MarkerId>,
}

impl RecordingSurface {
    pub fn at_zoom(zoom: f64) -> Self {
        Self {
            zoom,
            ..Self::default()
        }
    }
}

impl MapSurface for RecordingSurface {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn fly_to(&mut self, command: FlyTo) {
        self.zoom = command.zoom;
        self.flights.push(command);
    }

    fn render_points(&mut self, points: &PointSet, _style: &ClusterStyle) {
        self.renders.push(points.len());
    }

    fn show_draft_pin(&mut self, pin: Option<&DraftPin>) {
        self.pin = pin.copied();
    }

    fn show_selection(&mut self, feature: Option<&PointFeature>) {
        self.popup = feature.map(|f| f.id.clone());
    }
}

/// Earth radius used by the haversine distance.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Latitude offset in degrees that corresponds to `meters` due north.
pub fn north(meters: f64) -> f64 {
    meters / EARTH_RADIUS_M * (180.0 / std::f64::consts::PI)
}

pub fn fill(draft: &mut MarkerDraft, turbidity: &str, ph: &str, temperature: &str, bod: &str) {
    draft.turbidity = turbidity.into();
    draft.ph = ph.into();
    draft.temperature = temperature.into();
    draft.bod = bod.into();
}

pub fn valid_draft(latitude: f64, longitude: f64) -> MarkerDraft {
    let mut draft = MarkerDraft::at(Coordinates::new(latitude, longitude));
    fill(&mut draft, "5.2", "7.0", "25.5", "3.0");
    draft
}
