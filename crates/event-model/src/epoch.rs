//! Named time intervals drawn behind the density image.

use serde::{Deserialize, Serialize};

/// A named time interval. Used for overlay annotation only; epochs never
/// affect density computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epoch {
    pub name: String,
    pub t_begin: f64,
    pub t_end: f64,
}

impl Epoch {
    pub fn new(name: impl Into<String>, t_begin: f64, t_end: f64) -> Self {
        Self {
            name: name.into(),
            t_begin,
            t_end,
        }
    }

    /// Interval length in timepoints (negative if the bounds are reversed).
    pub fn duration(&self) -> f64 {
        self.t_end - self.t_begin
    }
}

/// Parse a JSON array of epochs.
pub fn parse_epochs(json: &str) -> Result<Vec<Epoch>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epochs() {
        let epochs =
            parse_epochs(r#"[{ "name": "baseline", "t_begin": 0, "t_end": 1000 }]"#).unwrap();
        assert_eq!(epochs, vec![Epoch::new("baseline", 0.0, 1000.0)]);
        assert_eq!(epochs[0].duration(), 1000.0);
    }
}
