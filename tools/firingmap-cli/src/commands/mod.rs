pub mod info;
pub mod nearest;
pub mod render;
pub mod watch;

use std::path::Path;

use firingmap_common::AppConfig;
use firingmap_event_model::{parse_epochs, Epoch, EventFormat, EventSet};

/// Load an event set, picking the format from the file extension.
pub fn load_events(path: &Path, config: &AppConfig) -> anyhow::Result<EventSet> {
    EventSet::load_with_default_rate(path, config.render.default_sample_rate)
        .map_err(|e| anyhow::anyhow!("Failed to load events: {e}"))
}

/// Async variant of [`load_events`] for use inside the tokio runtime.
pub async fn load_events_async(path: &Path, config: &AppConfig) -> anyhow::Result<EventSet> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read events at {}: {e}", path.display()))?;
    EventSet::parse(
        &content,
        EventFormat::from_path(path),
        config.render.default_sample_rate,
    )
    .map_err(|e| anyhow::anyhow!("Failed to parse events in {}: {e}", path.display()))
}

/// Load a JSON array of epochs.
pub fn load_epochs(path: &Path) -> anyhow::Result<Vec<Epoch>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read epochs at {}: {e}", path.display()))?;
    parse_epochs(&content).map_err(|e| anyhow::anyhow!("Failed to parse epochs: {e}"))
}
