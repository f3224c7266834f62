//! Firing event types.
//!
//! Events are stored as three parallel sequences (time, label, amplitude).
//! The position of an event in those sequences is its identity: grid
//! ownership and nearest-event queries refer to events by that index.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Sample rate assumed when none is supplied (Hz).
pub const DEFAULT_SAMPLE_RATE: f64 = 30_000.0;

/// A single firing event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event time, in timepoints.
    pub time: f64,
    /// Discrete cluster label.
    pub label: i32,
    /// Scalar amplitude.
    pub amplitude: f64,
}

/// An immutable set of events plus the sample rate they were recorded at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEventSet")]
pub struct EventSet {
    sample_rate: f64,
    times: Vec<f64>,
    labels: Vec<i32>,
    amplitudes: Vec<f64>,
}

/// Unvalidated JSON shape of an event set.
#[derive(Deserialize)]
struct RawEventSet {
    #[serde(default)]
    sample_rate: Option<f64>,
    times: Vec<f64>,
    labels: Vec<i32>,
    amplitudes: Vec<f64>,
}

impl RawEventSet {
    fn into_event_set(self, default_sample_rate: f64) -> Result<EventSet, ModelError> {
        let sample_rate = self.sample_rate.unwrap_or(default_sample_rate);
        Ok(EventSet::new(self.times, self.labels, self.amplitudes)?.with_sample_rate(sample_rate))
    }
}

impl TryFrom<RawEventSet> for EventSet {
    type Error = ModelError;

    fn try_from(raw: RawEventSet) -> Result<Self, Self::Error> {
        raw.into_event_set(DEFAULT_SAMPLE_RATE)
    }
}

/// On-disk layout of an event file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormat {
    /// `{ "sample_rate": .., "times": [..], "labels": [..], "amplitudes": [..] }`
    Json,
    /// Whitespace- or comma-separated `channel time label amplitude` rows.
    FiringsText,
}

impl EventFormat {
    /// `.json` (any case) is JSON; everything else is a firings table.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::FiringsText,
        }
    }
}

impl Default for EventSet {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            times: Vec::new(),
            labels: Vec::new(),
            amplitudes: Vec::new(),
        }
    }
}

impl EventSet {
    /// Build an event set from three aligned sequences.
    ///
    /// All sequences must have the same length and every time and amplitude
    /// must be finite.
    pub fn new(
        times: Vec<f64>,
        labels: Vec<i32>,
        amplitudes: Vec<f64>,
    ) -> Result<Self, ModelError> {
        if times.len() != labels.len() || times.len() != amplitudes.len() {
            return Err(ModelError::LengthMismatch {
                times: times.len(),
                labels: labels.len(),
                amplitudes: amplitudes.len(),
            });
        }

        if let Some(index) = times
            .iter()
            .zip(&amplitudes)
            .position(|(t, a)| !t.is_finite() || !a.is_finite())
        {
            return Err(ModelError::NonFinite { index });
        }

        Ok(Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            times,
            labels,
            amplitudes,
        })
    }

    /// Replace the sample rate (Hz).
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Parse an event set from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|source| ModelError::Json { source })
    }

    /// Parse a firings table in text form.
    ///
    /// One event per line with columns `channel time label amplitude`,
    /// separated by whitespace or commas. The channel column is ignored.
    /// Blank lines and `#` comments are skipped.
    pub fn from_firings_text(text: &str) -> Result<Self, ModelError> {
        let mut times = Vec::new();
        let mut labels = Vec::new();
        let mut amplitudes = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let columns: Vec<&str> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|c| !c.is_empty())
                .collect();
            if columns.len() < 4 {
                return Err(ModelError::Parse {
                    line: line_no + 1,
                    message: format!("expected 4 columns, found {}", columns.len()),
                });
            }

            let parse = |col: usize| -> Result<f64, ModelError> {
                columns[col].parse::<f64>().map_err(|e| ModelError::Parse {
                    line: line_no + 1,
                    message: format!("column {}: {e}", col + 1),
                })
            };

            times.push(parse(1)?);
            labels.push(parse(2)? as i32);
            amplitudes.push(parse(3)?);
        }

        Self::new(times, labels, amplitudes)
    }

    /// Parse file contents in the given format. `default_sample_rate`
    /// applies when the contents do not carry a rate (firings text never
    /// does).
    pub fn parse(
        content: &str,
        format: EventFormat,
        default_sample_rate: f64,
    ) -> Result<Self, ModelError> {
        match format {
            EventFormat::Json => serde_json::from_str::<RawEventSet>(content)
                .map_err(|source| ModelError::Json { source })?
                .into_event_set(default_sample_rate),
            EventFormat::FiringsText => {
                Ok(Self::from_firings_text(content)?.with_sample_rate(default_sample_rate))
            }
        }
    }

    /// Load from a file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        Self::load_with_default_rate(path, DEFAULT_SAMPLE_RATE)
    }

    /// Load from a file, falling back to `default_sample_rate` when the file
    /// does not specify one.
    pub fn load_with_default_rate(
        path: impl AsRef<Path>,
        default_sample_rate: f64,
    ) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, EventFormat::from_path(path), default_sample_rate)
            .map_err(|e| e.with_path(path))
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    /// The event at `index`, if any.
    pub fn event(&self, index: usize) -> Option<Event> {
        Some(Event {
            time: *self.times.get(index)?,
            label: self.labels[index],
            amplitude: self.amplitudes[index],
        })
    }

    /// Events in index order.
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.times
            .iter()
            .zip(&self.labels)
            .zip(&self.amplitudes)
            .map(|((&time, &label), &amplitude)| Event {
                time,
                label,
                amplitude,
            })
    }

    /// Number of events per label.
    pub fn label_counts(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for &label in &self.labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Latest event time converted to seconds. Zero when the set is empty
    /// or the sample rate is not positive.
    pub fn duration_secs(&self) -> f64 {
        let max_time = self.times.iter().copied().fold(0.0_f64, f64::max);
        if self.sample_rate > 0.0 {
            max_time / self.sample_rate
        } else {
            0.0
        }
    }
}

/// Errors that can occur when loading events.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error(
        "Event sequences differ in length: {times} times, {labels} labels, {amplitudes} amplitudes"
    )]
    LengthMismatch {
        times: usize,
        labels: usize,
        amplitudes: usize,
    },

    #[error("Event {index} has a non-finite time or amplitude")]
    NonFinite { index: usize },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid event JSON: {source}")]
    Json { source: serde_json::Error },

    #[error("Invalid event JSON in {path}: {source}")]
    JsonFile {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ModelError {
    /// Attach the source file to a JSON error.
    fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Json { source } => Self::JsonFile {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}
