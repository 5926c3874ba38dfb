//! Engine configuration.
//!
//! [`MatchConfig`] is immutable and valid by construction: the only ways to
//! obtain one are [`MatchConfig::default`], [`MatchConfigBuilder::build`] and
//! `TryFrom<MatchSettings>`, and the latter two validate before returning.
//! [`MatchSettings`] is the loose, serde-facing shape read from config files.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Tolerance when checking that the field weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ─── Weights ─────────────────────────────────────────────────────────────────

/// Relative weight of each field in the composite score. Must sum to 1.0 so
/// the composite stays on the same 0–100 scale as its components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
  pub title:       f64,
  pub description: f64,
  pub category:    f64,
}

impl Default for FieldWeights {
  fn default() -> Self {
    Self { title: 0.40, description: 0.40, category: 0.20 }
  }
}

impl FieldWeights {
  fn validate(&self) -> Result<(), ConfigError> {
    let fields = [
      ("title", self.title),
      ("description", self.description),
      ("category", self.category),
    ];
    for (field, value) in fields {
      if !value.is_finite() {
        return Err(ConfigError::NonFiniteWeight { field });
      }
      if value < 0.0 {
        return Err(ConfigError::NegativeWeight { field, value });
      }
    }

    let sum = self.title + self.description + self.category;
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
      return Err(ConfigError::WeightSum { sum });
    }
    Ok(())
  }
}

// ─── Category comparison ─────────────────────────────────────────────────────

/// How two category strings are compared.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CategoryMatch {
  /// Trimmed, case-insensitive equality: 100 or 0.
  #[default]
  Exact,
  /// Edit-distance similarity scaled to 0–100, counted only when it reaches
  /// `cutoff` (in `[0, 1]`); below the cutoff the category scores 0.
  Fuzzy { cutoff: f64 },
}

// ─── MatchConfig ─────────────────────────────────────────────────────────────

/// Validated scoring and generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
  weights:                FieldWeights,
  threshold:              f64,
  category_match:         CategoryMatch,
  require_category_match: bool,
  suppress_rejected:      bool,
  parallel:               bool,
  deadline:               Option<Duration>,
}

impl Default for MatchConfig {
  fn default() -> Self {
    Self {
      weights:                FieldWeights::default(),
      threshold:              30.0,
      category_match:         CategoryMatch::Exact,
      require_category_match: false,
      suppress_rejected:      false,
      parallel:               true,
      deadline:               None,
    }
  }
}

impl MatchConfig {
  pub fn builder() -> MatchConfigBuilder { MatchConfigBuilder::default() }

  pub fn weights(&self) -> FieldWeights { self.weights }

  /// Minimum composite score (0–100) for a pair to be surfaced.
  pub fn threshold(&self) -> f64 { self.threshold }

  pub fn category_match(&self) -> CategoryMatch { self.category_match }

  /// When set, pairs whose categories do not match are skipped before
  /// scoring. Off by default: a category mismatch only costs its weight.
  pub fn require_category_match(&self) -> bool { self.require_category_match }

  /// When set, a rejected candidate also blocks its pair from being
  /// generated again.
  pub fn suppress_rejected(&self) -> bool { self.suppress_rejected }

  pub fn parallel(&self) -> bool { self.parallel }

  /// Time budget for a single generation run.
  pub fn deadline(&self) -> Option<Duration> { self.deadline }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Builder for [`MatchConfig`]; starts from the defaults.
#[derive(Debug, Clone, Default)]
pub struct MatchConfigBuilder {
  config: MatchConfig,
}

impl MatchConfigBuilder {
  pub fn weights(mut self, weights: FieldWeights) -> Self {
    self.config.weights = weights;
    self
  }

  pub fn threshold(mut self, threshold: f64) -> Self {
    self.config.threshold = threshold;
    self
  }

  pub fn category_match(mut self, mode: CategoryMatch) -> Self {
    self.config.category_match = mode;
    self
  }

  pub fn require_category_match(mut self, on: bool) -> Self {
    self.config.require_category_match = on;
    self
  }

  pub fn suppress_rejected(mut self, on: bool) -> Self {
    self.config.suppress_rejected = on;
    self
  }

  pub fn parallel(mut self, on: bool) -> Self {
    self.config.parallel = on;
    self
  }

  pub fn deadline(mut self, deadline: Option<Duration>) -> Self {
    self.config.deadline = deadline;
    self
  }

  /// Validate and return the configuration.
  pub fn build(self) -> Result<MatchConfig, ConfigError> {
    let cfg = self.config;
    cfg.weights.validate()?;

    if !cfg.threshold.is_finite() || !(0.0..=100.0).contains(&cfg.threshold) {
      return Err(ConfigError::ThresholdOutOfRange(cfg.threshold));
    }

    if let CategoryMatch::Fuzzy { cutoff } = cfg.category_match
      && (!cutoff.is_finite() || !(0.0..=1.0).contains(&cutoff))
    {
      return Err(ConfigError::InvalidFuzzyCutoff(cutoff));
    }

    Ok(cfg)
  }
}

// ─── Settings (serde) ────────────────────────────────────────────────────────

/// Category comparison as spelled in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryMode {
  #[default]
  Exact,
  Fuzzy,
}

/// Unvalidated engine settings as read from TOML or the environment.
/// Convert with `MatchConfig::try_from`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
  pub title_weight:           f64,
  pub description_weight:     f64,
  pub category_weight:        f64,
  pub threshold:              f64,
  pub category_mode:          CategoryMode,
  /// Only read when `category_mode = "fuzzy"`.
  pub fuzzy_category_cutoff:  f64,
  pub require_category_match: bool,
  pub suppress_rejected:      bool,
  pub parallel:               bool,
  pub deadline_ms:            Option<u64>,
}

impl Default for MatchSettings {
  fn default() -> Self {
    let weights = FieldWeights::default();
    Self {
      title_weight:           weights.title,
      description_weight:     weights.description,
      category_weight:        weights.category,
      threshold:              30.0,
      category_mode:          CategoryMode::Exact,
      fuzzy_category_cutoff:  0.8,
      require_category_match: false,
      suppress_rejected:      false,
      parallel:               true,
      deadline_ms:            None,
    }
  }
}

impl TryFrom<MatchSettings> for MatchConfig {
  type Error = ConfigError;

  fn try_from(s: MatchSettings) -> Result<Self, Self::Error> {
    let category_match = match s.category_mode {
      CategoryMode::Exact => CategoryMatch::Exact,
      CategoryMode::Fuzzy => CategoryMatch::Fuzzy { cutoff: s.fuzzy_category_cutoff },
    };

    MatchConfig::builder()
      .weights(FieldWeights {
        title:       s.title_weight,
        description: s.description_weight,
        category:    s.category_weight,
      })
      .threshold(s.threshold)
      .category_match(category_match)
      .require_category_match(s.require_category_match)
      .suppress_rejected(s.suppress_rejected)
      .parallel(s.parallel)
      .deadline(s.deadline_ms.map(Duration::from_millis))
      .build()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    let built = MatchConfig::builder().build().unwrap();
    assert_eq!(built, MatchConfig::default());
    assert_eq!(built.threshold(), 30.0);
    assert_eq!(built.weights(), FieldWeights { title: 0.4, description: 0.4, category: 0.2 });
    assert!(!built.require_category_match());
    assert!(built.deadline().is_none());

    let from_settings = MatchConfig::try_from(MatchSettings::default()).unwrap();
    assert_eq!(from_settings, MatchConfig::default());
  }

  #[test]
  fn rejects_weights_that_do_not_sum_to_one() {
    let err = MatchConfig::builder()
      .weights(FieldWeights { title: 0.5, description: 0.5, category: 0.5 })
      .build()
      .unwrap_err();
    assert!(matches!(err, ConfigError::WeightSum { sum } if (sum - 1.5).abs() < 1e-9));
  }

  #[test]
  fn rejects_negative_and_non_finite_weights() {
    let err = MatchConfig::builder()
      .weights(FieldWeights { title: 1.2, description: -0.2, category: 0.0 })
      .build()
      .unwrap_err();
    assert!(matches!(err, ConfigError::NegativeWeight { field: "description", .. }));

    let err = MatchConfig::builder()
      .weights(FieldWeights { title: f64::NAN, description: 0.5, category: 0.5 })
      .build()
      .unwrap_err();
    assert_eq!(err, ConfigError::NonFiniteWeight { field: "title" });
  }

  #[test]
  fn rejects_out_of_range_threshold() {
    for bad in [-1.0, 100.5, f64::INFINITY, f64::NAN] {
      let err = MatchConfig::builder().threshold(bad).build().unwrap_err();
      assert!(matches!(err, ConfigError::ThresholdOutOfRange(_)), "threshold {bad}");
    }
    assert!(MatchConfig::builder().threshold(0.0).build().is_ok());
    assert!(MatchConfig::builder().threshold(100.0).build().is_ok());
  }

  #[test]
  fn rejects_bad_fuzzy_cutoff() {
    let err = MatchConfig::builder()
      .category_match(CategoryMatch::Fuzzy { cutoff: 1.5 })
      .build()
      .unwrap_err();
    assert_eq!(err, ConfigError::InvalidFuzzyCutoff(1.5));
  }

  #[test]
  fn settings_map_onto_config() {
    let settings = MatchSettings {
      title_weight: 0.5,
      description_weight: 0.3,
      category_weight: 0.2,
      threshold: 45.0,
      category_mode: CategoryMode::Fuzzy,
      fuzzy_category_cutoff: 0.7,
      require_category_match: true,
      deadline_ms: Some(250),
      ..MatchSettings::default()
    };
    let cfg = MatchConfig::try_from(settings).unwrap();
    assert_eq!(cfg.threshold(), 45.0);
    assert_eq!(cfg.category_match(), CategoryMatch::Fuzzy { cutoff: 0.7 });
    assert!(cfg.require_category_match());
    assert_eq!(cfg.deadline(), Some(Duration::from_millis(250)));
  }
}
