use anyhow::{Context, Result};
use aquamap_core::{aggregation::PointSet, logger};
use aquamap_schemas::category::WaterBody;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::surface::ConsoleSurface;

mod config;
mod plotting;
mod surface;
mod upload;
mod workflow;

#[derive(Parser, Debug)]
#[command(name = "aquamap", about = "Water-quality sample markers from the command line")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, default_value = "aquamap.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a session script against a fresh workspace.
    Run {
        script: PathBuf,
        /// Write the active store to this CSV file afterwards.
        #[arg(long)]
        export: Option<PathBuf>,
        /// Write the active point layer as GeoJSON.
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Save a PNG snapshot of the active store.
        #[arg(long)]
        plot: Option<PathBuf>,
        /// Record every committed mutation to this CSV file.
        #[arg(long)]
        mutation_log: Option<PathBuf>,
    },
    /// Generate a batch of sample markers into a CSV file.
    Samples {
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        count: Option<usize>,
        #[arg(long, default_value = "ponds")]
        category: WaterBody,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Render a marker CSV file to PNG.
    Plot {
        csv: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Upload a CSV file through a pre-signed URL.
    Upload {
        csv: PathBuf,
        /// Overrides the endpoint from the config file.
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .init();

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Command::Run {
            script,
            export,
            geojson,
            plot,
            mutation_log,
        } => {
            println!("--- Aquamap Session: {} ---", script.display());
            let script = workflow::load_script(&script)?;
            let category = script.category.unwrap_or_default();
            let mut ws = workflow::build_workspace(&config, category, mutation_log.as_deref())?;
            let mut surface = ConsoleSurface::new(config.map.center, config.map.zoom);

            let summary = workflow::run_script(&script, &mut ws, &mut surface);

            if let Some(path) = export {
                let rows = ws
                    .export_csv(&path)
                    .with_context(|| format!("Failed to export markers to {:?}", path))?;
                println!("Exported {} markers to '{}'", rows, path.display());
            }
            if let Some(path) = geojson {
                let text = serde_json::to_string_pretty(&ws.point_set().to_geojson())?;
                fs::write(&path, text).with_context(|| format!("Failed to write {:?}", path))?;
                println!("Wrote point layer to '{}'", path.display());
            }
            if let Some(path) = plot {
                let title = format!("{} markers", ws.active_category().label());
                plotting::plot_markers(&path, &title, &ws.point_set())?;
            }

            workflow::print_summary_report(&summary, &ws, &surface);
        }
        Command::Samples {
            out,
            count,
            category,
            seed,
        } => {
            let mut config = config;
            if seed.is_some() {
                config.sampling.seed = seed;
            }
            let mut ws = workflow::build_workspace(&config, category, None)?;
            let mut surface = ConsoleSurface::new(config.map.center, config.map.zoom);
            let added = ws.generate_samples(count, &mut surface)?;
            ws.export_csv(&out)
                .with_context(|| format!("Failed to export samples to {:?}", out))?;
            println!("Wrote {} {} samples to '{}'", added.len(), category.label(), out.display());
        }
        Command::Plot { csv, out } => {
            let records = logger::read_markers(&csv)?;
            let markers: Vec<_> = records.iter().map(|r| r.to_marker()).collect();
            let title = match records.first() {
                Some(record) => format!("{} markers", record.category.label()),
                None => "Markers".to_string(),
            };
            plotting::plot_markers(&out, &title, &PointSet::from_markers(&markers))?;
        }
        Command::Upload { csv, endpoint } => {
            let endpoint = endpoint.unwrap_or(config.upload.endpoint);
            let bytes = upload::upload_csv(&endpoint, &csv, |percent| {
                print!("\rUploading... {:>3}%", percent);
                let _ = std::io::Write::flush(&mut std::io::stdout());
            })?;
            println!("\nUpload complete: {} bytes from '{}'", bytes, csv.display());
        }
    }

    Ok(())
}
