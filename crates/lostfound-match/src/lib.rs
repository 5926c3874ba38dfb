//! Matching engine for lost and found item reports.
//!
//! Layers, leaves first:
//!
//! - [`similarity`]: case-insensitive Levenshtein similarity in `[0, 1]`.
//! - [`scorer`]: per-field scores and the weighted composite for one pair.
//! - [`generator`]: the cross-product of active reports, duplicate
//!   suppression, threshold and ordering.
//! - [`driver`]: reads a [`lostfound_core::store::MatchStore`], generates, and
//!   writes the new candidates back.
//!
//! Scoring is pure. All tuning lives in an immutable [`MatchConfig`] that is
//! validated when it is built.

pub mod config;
pub mod driver;
pub mod error;
pub mod generator;
pub mod scorer;
pub mod similarity;

pub use config::{
  CategoryMatch, CategoryMode, FieldWeights, MatchConfig, MatchConfigBuilder, MatchSettings,
};
pub use driver::run_generation;
pub use error::ConfigError;
pub use generator::{Generation, GenerationStats, MatchGenerator};
pub use scorer::{FieldScorer, RecordField, RecordIssue, RecordSide, ScoreBreakdown};
pub use similarity::{levenshtein, similarity};
