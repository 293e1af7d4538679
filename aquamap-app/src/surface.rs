//! A map stand-in for the terminal: keeps the viewport and layers in memory
//! and traces every command.

use aquamap_core::{
    aggregation::{ClusterStyle, PointFeature, PointSet},
    map_port::MapSurface,
    session::DraftPin,
};
use aquamap_schemas::{event::FlyTo, geo::Coordinates, marker::MarkerId};
use tracing::{debug, info};

pub struct ConsoleSurface {
    center: Coordinates,
    zoom: f64,
    points: usize,
    pin: Option<DraftPin>,
    popup: Option<MarkerId>,
    flights: usize,
}

impl ConsoleSurface {
    pub fn new(center: Coordinates, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            points: 0,
            pin: None,
            popup: None,
            flights: 0,
        }
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    pub fn rendered_points(&self) -> usize {
        self.points
    }

    pub fn flights(&self) -> usize {
        self.flights
    }

    pub fn draft_pin(&self) -> Option<&DraftPin> {
        self.pin.as_ref()
    }

    pub fn popup(&self) -> Option<&MarkerId> {
        self.popup.as_ref()
    }
}

impl MapSurface for ConsoleSurface {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn fly_to(&mut self, command: FlyTo) {
        info!(
            lat = command.center.latitude,
            lng = command.center.longitude,
            zoom = command.zoom,
            duration_ms = command.duration_ms,
            "fly to"
        );
        self.center = command.center;
        self.zoom = command.zoom;
        self.flights += 1;
    }

    fn render_points(&mut self, points: &PointSet, style: &ClusterStyle) {
        let [red, blue, yellow, green] = points.color_counts();
        debug!(
            points = points.len(),
            red, blue, yellow, green,
            radius_px = style.radius_px,
            "render point layer"
        );
        self.points = points.len();
    }

    fn show_draft_pin(&mut self, pin: Option<&DraftPin>) {
        if let Some(pin) = pin {
            debug!(lat = pin.coordinates.latitude, lng = pin.coordinates.longitude, "draft pin");
        }
        self.pin = pin.copied();
    }

    fn show_selection(&mut self, feature: Option<&PointFeature>) {
        if let Some(feature) = feature {
            let rows: Vec<String> = feature
                .popup_rows()
                .into_iter()
                .map(|(label, value)| format!("{}: {}", label, value))
                .collect();
            info!(marker = %feature.id, popup = %rows.join(", "), "point popup");
        }
        self.popup = feature.map(|f| f.id.clone());
    }
}
