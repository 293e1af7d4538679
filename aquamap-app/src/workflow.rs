use crate::config::AppConfig;
use crate::surface::ConsoleSurface;
use anyhow::{anyhow, Context, Result};
use aquamap_core::{
    interaction::InteractionOutcome,
    map_port::MapSurface,
    workspace::{Workspace, WorkspaceBuilder, WorkspaceEvent},
};
use aquamap_schemas::{
    category::WaterBody,
    event::MapEvent,
    file_formats::{FieldInput, ScriptFile, ScriptStep},
    geo::Coordinates,
    marker::{MarkerColor, MarkerId},
    parameter::Parameter,
};
use std::{fs, path::Path};
use tracing::{info, warn};

/// What a script run did, for the final report.
#[derive(Debug, Default)]
pub struct ScriptSummary {
    pub steps: usize,
    pub failures: Vec<(usize, String)>,
    pub events: Vec<WorkspaceEvent>,
}

pub fn load_script(path: &Path) -> Result<ScriptFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {:?}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML from {:?}", path))
}

pub fn build_workspace(config: &AppConfig, category: WaterBody, mutation_log: Option<&Path>) -> Result<Workspace> {
    let mut builder = WorkspaceBuilder::new()
        .with_active_category(category)
        .with_interaction_config(config.interaction.clone())
        .with_cluster_style(config.clustering.clone())
        .with_sampling(config.sampling.clone());
    if let Some(path) = mutation_log {
        let path = path
            .to_str()
            .ok_or_else(|| anyhow!("Mutation log path is not valid UTF-8: {:?}", path))?;
        builder = builder.with_mutation_log(path);
    }
    Ok(builder.build()?)
}

/// Replays every step of `script`. A failing step is reported and the run
/// continues, the same way a user corrects the form and tries again.
pub fn run_script(script: &ScriptFile, workspace: &mut Workspace, surface: &mut ConsoleSurface) -> ScriptSummary {
    let mut summary = ScriptSummary::default();
    if let Some(category) = script.category {
        workspace.switch_category(category, surface);
    }
    workspace.refresh(surface);

    for (index, step) in script.steps.iter().enumerate() {
        summary.steps += 1;
        if let Err(err) = run_step(step, workspace, surface) {
            warn!(step = index + 1, error = %err, "step failed");
            println!("  ! step {}: {}", index + 1, err);
            summary.failures.push((index + 1, err.to_string()));
        }
    }
    summary.events = workspace.take_events();
    summary
}

fn run_step(step: &ScriptStep, ws: &mut Workspace, surface: &mut ConsoleSurface) -> Result<()> {
    match step {
        ScriptStep::SwitchCategory { category } => {
            ws.switch_category(*category, surface);
        }
        ScriptStep::ContextClick { latitude, longitude } => {
            let event = MapEvent::ContextMenu {
                coordinates: Coordinates::new(*latitude, *longitude),
            };
            ws.handle_event(&event, surface);
        }
        ScriptStep::MapClick { latitude, longitude } => {
            let event = MapEvent::Click {
                coordinates: Coordinates::new(*latitude, *longitude),
            };
            ws.handle_event(&event, surface);
        }
        ScriptStep::MarkerClick { target } => {
            let marker_id = target_id(ws, *target)?;
            expect_handled(ws.handle_event(&MapEvent::MarkerClick { marker_id }, surface))?;
        }
        ScriptStep::PointClick { target } => {
            let marker_id = target_id(ws, *target)?;
            let coordinates = ws
                .store()
                .get(&marker_id)
                .map(|m| m.coordinates())
                .ok_or_else(|| anyhow!("No marker '{}'", marker_id))?;
            expect_handled(ws.handle_event(
                &MapEvent::PointClick {
                    marker_id,
                    coordinates,
                },
                surface,
            ))?;
        }
        ScriptStep::ClusterClick {
            cluster_id,
            latitude,
            longitude,
            point_count,
        } => {
            let event = MapEvent::ClusterClick {
                cluster_id: *cluster_id,
                coordinates: Coordinates::new(*latitude, *longitude),
                point_count: *point_count,
            };
            ws.handle_event(&event, surface);
        }
        ScriptStep::Fill {
            latitude,
            longitude,
            turbidity,
            ph,
            temperature,
            bod,
            conductivity,
            aod,
        } => {
            let form = ws.form_mut();
            if let Some(value) = latitude {
                form.latitude = value.clone().into_text();
            }
            if let Some(value) = longitude {
                form.longitude = value.clone().into_text();
            }
            let parameters: [(Parameter, &Option<FieldInput>); 6] = [
                (Parameter::Turbidity, turbidity),
                (Parameter::Ph, ph),
                (Parameter::Temperature, temperature),
                (Parameter::Bod, bod),
                (Parameter::Conductivity, conductivity),
                (Parameter::Aod, aod),
            ];
            for (parameter, value) in parameters {
                if let Some(value) = value {
                    form.set_value(parameter, value.clone().into_text());
                }
            }
        }
        ScriptStep::SetColor { color } => {
            ws.form_mut().color = Some(*color);
        }
        ScriptStep::Toggle { parameter } => {
            if !parameter.is_optional() {
                return Err(anyhow!("'{}' is required and cannot be toggled", parameter));
            }
            ws.toggle_optional(*parameter);
        }
        ScriptStep::Submit => {
            let marker = ws.submit(surface)?;
            println!("  + {} at ({:.5}, {:.5})", marker.id, marker.fields.latitude, marker.fields.longitude);
        }
        ScriptStep::Edit { target } => {
            let id = target_id(ws, *target)?;
            ws.begin_edit(&id, surface)?;
        }
        ScriptStep::Remove { target } => {
            let id = target_id(ws, *target)?;
            ws.remove(&id, surface);
            println!("  - {}", id);
        }
        ScriptStep::Cancel => ws.cancel(surface),
        ScriptStep::DismissPin => {
            ws.dismiss_pin(surface);
        }
        ScriptStep::ClosePopup => ws.close_popup(surface),
        ScriptStep::GenerateSamples { count } => {
            let added = ws.generate_samples(*count, surface)?;
            println!("  + {} sample markers", added.len());
        }
        ScriptStep::DeleteSamples => {
            let removed = ws.delete_samples(surface);
            println!("  - {} sample markers", removed);
        }
    }
    Ok(())
}

/// Resolves a list position in the active store to a marker id.
fn target_id(ws: &Workspace, target: usize) -> Result<MarkerId> {
    ws.store()
        .markers()
        .get(target)
        .map(|m| m.id.clone())
        .ok_or_else(|| anyhow!("No marker at position {} (store has {})", target, ws.store().len()))
}

fn expect_handled(outcome: InteractionOutcome) -> Result<()> {
    match outcome {
        InteractionOutcome::Ignored => Err(anyhow!("Event was ignored by the map")),
        _ => Ok(()),
    }
}

pub fn print_summary_report(summary: &ScriptSummary, ws: &Workspace, surface: &ConsoleSurface) {
    let count = |f: fn(&WorkspaceEvent) -> bool| summary.events.iter().filter(|e| f(e)).count();

    println!("\n--- [Session Summary] ---");
    println!("========================================");
    println!(
        "Steps run: {} ({} failed)",
        summary.steps,
        summary.failures.len()
    );
    println!(
        "Markers added: {} | updated: {} | removed: {}",
        count(|e| matches!(e, WorkspaceEvent::MarkerAdded { .. })),
        count(|e| matches!(e, WorkspaceEvent::MarkerUpdated { .. })),
        count(|e| matches!(e, WorkspaceEvent::MarkerRemoved { .. })),
    );
    println!("----------------------------------------");

    println!("\nStores:");
    for category in WaterBody::ALL {
        let store = ws.catalog().store(category);
        let marker = if category == ws.active_category() { "*" } else { " " };
        println!(
            " {} {:<6} | {:>4} markers ({} samples)",
            marker,
            category.label(),
            store.len(),
            store.sample_ids().len()
        );
    }

    let points = ws.point_set();
    println!("\nActive point layer by color:");
    for (color, n) in MarkerColor::ALL.iter().zip(points.color_counts()) {
        println!("  - {:<7} {:>4}", color.key(), n);
    }

    let center = surface.center();
    println!(
        "\nViewport: ({:.4}, {:.4}) at zoom {:.1} after {} fly-to commands",
        center.latitude,
        center.longitude,
        surface.zoom(),
        surface.flights()
    );
    if let Some(id) = surface.popup() {
        println!("Open popup: {}", id);
    }
    if let Some(pin) = surface.draft_pin() {
        println!(
            "Open draft pin: ({:.5}, {:.5})",
            pin.coordinates.latitude, pin.coordinates.longitude
        );
    }
    if !summary.failures.is_empty() {
        println!("\nFailed steps:");
        for (step, reason) in &summary.failures {
            println!("  - #{}: {}", step, reason);
        }
    }
    println!("========================================");
    info!(rendered = surface.rendered_points(), "session finished");
}
