//! Domain bounds derived from an event set.

use firingmap_event_model::EventSet;
use serde::{Deserialize, Serialize};

/// The time/amplitude range covered by the current event set.
///
/// Always derived from the events, never set independently. An empty set
/// yields all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainExtent {
    pub max_time: f64,
    pub min_amplitude: f64,
    pub max_amplitude: f64,
}

impl DomainExtent {
    pub fn new(max_time: f64, min_amplitude: f64, max_amplitude: f64) -> Self {
        Self {
            max_time,
            min_amplitude,
            max_amplitude,
        }
    }

    /// Compute the extent of an event set.
    pub fn from_events(events: &EventSet) -> Self {
        Self {
            max_time: max_or_zero(events.times()),
            min_amplitude: min_or_zero(events.amplitudes()),
            max_amplitude: max_or_zero(events.amplitudes()),
        }
    }

    /// Amplitude span (`max - min`).
    pub fn amplitude_span(&self) -> f64 {
        self.max_amplitude - self.min_amplitude
    }

    /// True when mapping would divide by zero; every point then maps to
    /// the origin.
    pub fn is_degenerate(&self) -> bool {
        self.max_time == 0.0 || self.max_amplitude == self.min_amplitude
    }
}

fn max_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

fn min_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}
