//! Show event set information.

use std::path::PathBuf;
use std::time::Instant;

use firingmap_common::AppConfig;
use firingmap_density_core::{DensityView, ViewConfig};

use super::{load_epochs, load_events};

pub fn run(
    input: PathBuf,
    epochs: Option<PathBuf>,
    width: f64,
    height: f64,
    json: bool,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let events = load_events(&input, config)?;
    let label_counts = events.label_counts();
    let duration_secs = events.duration_secs();

    let mut view = DensityView::new(ViewConfig::from(&config.render), width, height);
    view.set_events(events, Instant::now());
    if let Some(path) = epochs {
        view.set_epochs(load_epochs(&path)?);
    }

    let bands = if view.epochs().is_empty() {
        Vec::new()
    } else {
        view.epoch_bands()
            .map_err(|e| anyhow::anyhow!("Failed to lay out epochs: {e}"))?
    };
    let extent = view.extent();

    if json {
        let summary = serde_json::json!({
            "events": view.events().len(),
            "sample_rate": view.sample_rate(),
            "duration_secs": duration_secs,
            "extent": extent,
            "degenerate": extent.is_degenerate(),
            "labels": label_counts,
            "epoch_bands": bands,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Events: {}", input.display());
    println!("  Count: {}", view.events().len());
    println!("  Sample rate: {} Hz", view.sample_rate());
    println!("  Duration: {duration_secs:.3}s");
    println!();

    println!("Extent:");
    println!("  Max time: {}", extent.max_time);
    println!(
        "  Amplitude: {} .. {}",
        extent.min_amplitude, extent.max_amplitude
    );
    if extent.is_degenerate() {
        println!("  (degenerate: every event maps to the origin)");
    }
    println!();

    println!("Labels:");
    for (label, count) in &label_counts {
        println!("  {label}: {count}");
    }

    if !bands.is_empty() {
        println!();
        println!("Epochs ({width}x{height} window):");
        for band in &bands {
            println!(
                "  {}: x={:.1} y={:.1} w={:.1} h={:.1} label={:?}",
                band.name, band.x, band.y, band.width, band.height, band.anchor
            );
        }
    }

    Ok(())
}
