use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, SelectionError};
use crate::feature_selection::sffs::{Criteria, MAX_ITERATIONS_WITHOUT_PROGRESS};

/// Settings for the KNN evaluator.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KnnConfig {
    /// Number of neighbors that vote.
    pub k: usize,
    /// Fraction of the instances (by iteration order) used for training.
    pub train_ratio: f64,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            k: 3,
            train_ratio: 0.7,
        }
    }
}

impl KnnConfig {
    pub fn new(k: usize, train_ratio: f64) -> Self {
        Self { k, train_ratio }
    }

    pub fn validate(&self) -> Result<()> {
        validate_k(self.k)?;
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(SelectionError::InvalidConfig(format!(
                "train_ratio must lie strictly between 0 and 1, got {}",
                self.train_ratio
            )));
        }
        Ok(())
    }
}

/// Rejects a neighbor count of zero.
pub(crate) fn validate_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(SelectionError::InvalidConfig("k must be at least 1".to_string()));
    }
    Ok(())
}

/// Serializable form of the stopping rule for the floating search.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StoppingCriteria {
    MaxFeatures { max_features: usize },
    NoProgress { max_iterations_without_progress: usize },
}

impl Default for StoppingCriteria {
    fn default() -> Self {
        StoppingCriteria::NoProgress {
            max_iterations_without_progress: MAX_ITERATIONS_WITHOUT_PROGRESS,
        }
    }
}

impl FromStr for StoppingCriteria {
    type Err = String;

    /// Accepts `max-features:<n>`, `no-progress` and `no-progress:<n>`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        let (name, value) = match lowered.split_once(':') {
            Some((name, value)) => (name, Some(value)),
            None => (lowered.as_str(), None),
        };
        let parse_count = |value: &str| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|e| format!("Invalid count '{}' in stopping criteria: {}", value, e))
        };

        match (name.trim(), value) {
            ("max-features", Some(value)) => Ok(StoppingCriteria::MaxFeatures {
                max_features: parse_count(value)?,
            }),
            ("max-features", None) => {
                Err("max-features requires a count, e.g. max-features:5".to_string())
            }
            ("no-progress", Some(value)) => Ok(StoppingCriteria::NoProgress {
                max_iterations_without_progress: parse_count(value)?,
            }),
            ("no-progress", None) => Ok(StoppingCriteria::default()),
            _ => Err(format!(
                "Unknown stopping criteria: {}. Expected max-features:<n> or no-progress[:<n>]",
                s
            )),
        }
    }
}

impl From<&StoppingCriteria> for Criteria {
    fn from(stopping: &StoppingCriteria) -> Self {
        match *stopping {
            StoppingCriteria::MaxFeatures { max_features } => Criteria::MaxFeatures(max_features),
            StoppingCriteria::NoProgress {
                max_iterations_without_progress,
            } => Criteria::NoProgressLimit(max_iterations_without_progress),
        }
    }
}

/// Everything a selection run needs besides the instances.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    pub knn: KnnConfig,
    pub stopping: StoppingCriteria,
}

impl SelectionConfig {
    pub fn new(knn: KnnConfig, stopping: StoppingCriteria) -> Self {
        Self { knn, stopping }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knn_defaults_match_reference_settings() {
        let cfg = KnnConfig::default();
        assert_eq!(cfg.k, 3);
        assert!((cfg.train_ratio - 0.7).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn knn_validate_rejects_bad_values() {
        assert!(KnnConfig::new(0, 0.7).validate().is_err());
        assert!(KnnConfig::new(3, 0.0).validate().is_err());
        assert!(KnnConfig::new(3, 1.0).validate().is_err());
        assert!(KnnConfig::new(3, f64::NAN).validate().is_err());
    }

    #[test]
    fn stopping_criteria_parses_from_str() {
        assert_eq!(
            "max-features:4".parse::<StoppingCriteria>().unwrap(),
            StoppingCriteria::MaxFeatures { max_features: 4 }
        );
        assert_eq!(
            "No-Progress:7".parse::<StoppingCriteria>().unwrap(),
            StoppingCriteria::NoProgress {
                max_iterations_without_progress: 7
            }
        );
        assert_eq!(
            "no-progress".parse::<StoppingCriteria>().unwrap(),
            StoppingCriteria::default()
        );
        assert!("max-features".parse::<StoppingCriteria>().is_err());
        assert!("max-features:x".parse::<StoppingCriteria>().is_err());
        assert!("forever".parse::<StoppingCriteria>().is_err());
    }
}
