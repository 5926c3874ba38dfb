//! Field scoring for a single lost/found pair.

use lostfound_core::item::{FoundItem, LostItem, Report};
use serde::Serialize;

use crate::{
  config::{CategoryMatch, FieldWeights, MatchConfig},
  similarity::similarity,
};

// ─── Record issues ───────────────────────────────────────────────────────────

/// Which record of the pair an issue was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSide {
  Lost,
  Found,
}

/// A text field the scorer requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordField {
  Title,
  Description,
}

/// A required field was blank on one side of the pair. The field scored 0;
/// scoring of the pair still completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordIssue {
  pub side:  RecordSide,
  pub field: RecordField,
}

// ─── Breakdown ───────────────────────────────────────────────────────────────

/// Composite score and its components, all on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
  pub composite:   f64,
  pub title:       f64,
  pub description: f64,
  pub category:    f64,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub issues:      Vec<RecordIssue>,
}

impl ScoreBreakdown {
  pub fn is_clean(&self) -> bool { self.issues.is_empty() }
}

// ─── Scorer ──────────────────────────────────────────────────────────────────

/// Scores lost/found pairs with fixed weights. Cheap to copy; holds no state
/// beyond its configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScorer {
  weights:        FieldWeights,
  category_match: CategoryMatch,
}

impl Default for FieldScorer {
  fn default() -> Self { Self::new(&MatchConfig::default()) }
}

impl FieldScorer {
  pub fn new(config: &MatchConfig) -> Self {
    Self {
      weights:        config.weights(),
      category_match: config.category_match(),
    }
  }

  /// Score one pair. Titles are compared with titles and descriptions with
  /// descriptions; the result is not assumed symmetric across record types.
  pub fn score(&self, lost: &LostItem, found: &FoundItem) -> ScoreBreakdown {
    let mut issues = Vec::new();

    let title = text_score(
      lost.title(),
      found.title(),
      RecordField::Title,
      &mut issues,
    );
    let description = text_score(
      lost.description(),
      found.description(),
      RecordField::Description,
      &mut issues,
    );
    let category = self.category_score(lost.category(), found.category());

    let w = self.weights;
    let composite = (w.title * title + w.description * description + w.category * category)
      .clamp(0.0, 100.0);

    ScoreBreakdown { composite, title, description, category, issues }
  }

  /// Whether the pair passes the optional category gate.
  pub fn categories_match(&self, lost: &impl Report, found: &impl Report) -> bool {
    self.category_score(lost.category(), found.category()) > 0.0
  }

  fn category_score(&self, a: &str, b: &str) -> f64 {
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
      return 0.0;
    }

    match self.category_match {
      CategoryMatch::Exact => {
        if a.to_lowercase() == b.to_lowercase() { 100.0 } else { 0.0 }
      }
      CategoryMatch::Fuzzy { cutoff } => {
        let s = similarity(a, b);
        if s >= cutoff && s > 0.0 { s * 100.0 } else { 0.0 }
      }
    }
  }
}

/// Similarity of one required text field, or 0 with an issue recorded for
/// each blank side. Whitespace only decides blankness; the similarity is taken
/// over the text as given.
fn text_score(
  lost: &str,
  found: &str,
  field: RecordField,
  issues: &mut Vec<RecordIssue>,
) -> f64 {
  let mut blank = false;

  if lost.trim().is_empty() {
    issues.push(RecordIssue { side: RecordSide::Lost, field });
    blank = true;
  }
  if found.trim().is_empty() {
    issues.push(RecordIssue { side: RecordSide::Found, field });
    blank = true;
  }

  if blank { 0.0 } else { similarity(lost, found) * 100.0 }
}
