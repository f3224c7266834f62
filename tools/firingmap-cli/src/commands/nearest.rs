//! Find the event nearest to a window pixel.

use std::path::PathBuf;
use std::time::Instant;

use firingmap_common::AppConfig;
use firingmap_density_core::{DensityView, Point2D, ViewConfig};

use super::load_events;

pub fn run(
    input: PathBuf,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let events = load_events(&input, config)?;

    let mut view = DensityView::new(ViewConfig::from(&config.render), width, height);
    view.set_events(events, Instant::now());
    let frame = view
        .rebuild()
        .map_err(|e| anyhow::anyhow!("Failed to build density grid: {e}"))?;

    println!(
        "Grid: {}x{} ({} events binned)",
        frame.width(),
        frame.height(),
        frame.density.total()
    );

    let domain = view
        .window_to_domain(Point2D::new(x, y))
        .map_err(|e| anyhow::anyhow!("Window too small for margins: {e}"))?;
    println!(
        "Point ({x}, {y}) -> time {:.3}, amplitude {:.3}",
        domain.time, domain.amplitude
    );

    let nearest = view
        .nearest_event_at_window(Point2D::new(x, y))
        .map_err(|e| anyhow::anyhow!("Nearest-event query failed: {e}"))?;

    match nearest.and_then(|index| Some((index, view.events().event(index)?))) {
        Some((index, event)) => {
            println!("Nearest event: #{index}");
            println!(
                "  time: {} ({:.4}s)",
                event.time,
                event.time / view.sample_rate()
            );
            println!("  label: {}", event.label);
            println!("  amplitude: {}", event.amplitude);
        }
        None => println!("No events on the grid."),
    }

    Ok(())
}
