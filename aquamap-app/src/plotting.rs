//! Marker snapshots rendered to PNG.

use anyhow::{anyhow, Result};
use aquamap_core::aggregation::PointSet;
use aquamap_schemas::marker::MarkerColor;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Degrees of padding around the marker extent.
const MARGIN_DEG: f64 = 0.01;

/// Draws every point of `points` at its longitude/latitude, filled with its
/// palette color, plus a legend with per-color counts.
pub fn plot_markers(path: &Path, title: &str, points: &PointSet) -> Result<()> {
    if points.is_empty() {
        println!("[Plotting] Warning: No markers to plot.");
        return Ok(());
    }

    let (min_lng, max_lng, min_lat, max_lat) = points.features().iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(x0, x1, y0, y1), f| {
            let c = f.coordinates;
            (
                x0.min(c.longitude),
                x1.max(c.longitude),
                y0.min(c.latitude),
                y1.max(c.latitude),
            )
        },
    );

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (min_lng - MARGIN_DEG)..(max_lng + MARGIN_DEG),
            (min_lat - MARGIN_DEG)..(max_lat + MARGIN_DEG),
        )?;

    chart
        .configure_mesh()
        .x_desc("Longitude (°)")
        .y_desc("Latitude (°)")
        .draw()?;

    let counts = points.color_counts();
    for color in MarkerColor::ALL {
        let (r, g, b) = color.rgb();
        let style = RGBColor(r, g, b);
        chart
            .draw_series(
                points
                    .features()
                    .iter()
                    .filter(|f| f.color == color)
                    .map(|f| Circle::new((f.coordinates.longitude, f.coordinates.latitude), 5, style.filled())),
            )?
            .label(format!("{} ({})", color.key(), counts[color.index() as usize]))
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, style.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()
        .map_err(|e| anyhow!("Failed to write plot {:?}: {}", path, e))?;

    info!(path = %path.display(), points = points.len(), "marker snapshot saved");
    Ok(())
}
