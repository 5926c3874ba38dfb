//! Configuration errors. These are the only fatal errors in the engine; a
//! single badly-formed record never aborts a generation run.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("weight for {field} is not a finite number")]
  NonFiniteWeight { field: &'static str },

  #[error("weight for {field} is negative: {value}")]
  NegativeWeight { field: &'static str, value: f64 },

  #[error("field weights must sum to 1.0, got {sum}")]
  WeightSum { sum: f64 },

  #[error("threshold must be within 0..=100, got {0}")]
  ThresholdOutOfRange(f64),

  #[error("fuzzy category cutoff must be within 0..=1, got {0}")]
  InvalidFuzzyCutoff(f64),
}
