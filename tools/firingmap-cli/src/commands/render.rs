//! Render a density image to PNG.

use std::path::{Path, PathBuf};
use std::time::Instant;

use firingmap_common::AppConfig;
use firingmap_density_core::{DensityView, ViewConfig};

use super::load_events;

pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let width = width.unwrap_or(config.render.export_width);
    let height = height.unwrap_or(config.render.export_height);
    let output = output.unwrap_or_else(|| default_output(&input));

    println!("Rendering events from: {}", input.display());

    let events = load_events(&input, config)?;
    println!("  Loaded {} events", events.len());

    let mut view = DensityView::new(
        ViewConfig::from(&config.render),
        width as f64,
        height as f64,
    );
    view.set_events(events, Instant::now());

    let extent = view.extent();
    if extent.is_degenerate() {
        println!("  Extent is degenerate; all events collapse to the origin.");
    }

    let image = view
        .render_image(width, height)
        .map_err(|e| anyhow::anyhow!("Render failed: {e}"))?;
    image
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    println!("  Resolution: {width}x{height}");
    println!("  Output: {}", output.display());

    Ok(())
}

/// `<input stem>.png` next to the input file.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("png")
}
