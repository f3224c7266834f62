//! Watch an event file and re-render after changes settle.
//!
//! Each detected modification reloads the events and requests a rebuild.
//! A burst of writes coalesces into one render, fired a debounce delay after
//! the first write of the burst.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use firingmap_common::AppConfig;
use firingmap_density_core::{DensityView, ViewConfig};

use super::load_events_async;
use super::render::default_output;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| default_output(&input));
    let (width, height) = (config.render.export_width, config.render.export_height);

    println!("Watching: {}", input.display());
    println!("  Output: {}", output.display());
    println!("  Debounce: {}ms (Ctrl-C to stop)", config.render.debounce_ms);

    // Grid columns match the export width, so each published frame is the
    // export image itself.
    let view_config = ViewConfig {
        grid_width: width as usize,
        ..ViewConfig::from(&config.render)
    };
    let mut view = DensityView::new(view_config, width as f64, height as f64);
    let mut last_modified: Option<SystemTime> = None;
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                println!("\nStopped.");
                return Ok(());
            }
        }

        let now = Instant::now();
        let modified = tokio::fs::metadata(&input)
            .await
            .and_then(|m| m.modified())
            .ok();

        if modified.is_some() && modified != last_modified {
            last_modified = modified;
            match load_events_async(&input, config).await {
                Ok(events) => {
                    tracing::debug!(events = events.len(), "input changed");
                    view.set_events(events, now);
                }
                Err(e) => tracing::warn!("Skipping unreadable input: {e}"),
            }
        }

        match view.poll(now) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::warn!("Rebuild failed: {e}");
                continue;
            }
        }

        if let Some(frame) = view.frame() {
            frame
                .image
                .save(&output)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;
            println!(
                "  Rendered {} events -> {}",
                view.events().len(),
                output.display()
            );
        }
    }
}
