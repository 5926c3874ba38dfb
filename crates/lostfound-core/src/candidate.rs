//! Match candidates: proposed pairings awaiting human review.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Review status of a candidate. Generation always emits
/// [`MatchStatus::Pending`]; only the review workflow moves it on.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
  #[default]
  Pending,
  Confirmed,
  Rejected,
}

impl MatchStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Confirmed => "confirmed",
      Self::Rejected => "rejected",
    }
  }

  /// A live candidate blocks generation of another candidate for its pair.
  pub fn is_live(self) -> bool {
    matches!(self, Self::Pending | Self::Confirmed)
  }
}

impl fmt::Display for MatchStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for MatchStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(Self::Pending),
      "confirmed" => Ok(Self::Confirmed),
      "rejected" => Ok(Self::Rejected),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

// ─── Candidate ───────────────────────────────────────────────────────────────

/// A scored pairing of one lost and one found item.
///
/// All scores are on a 0–100 scale. The component scores are kept so a
/// reviewer can see why a pair was surfaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
  pub match_id:          Uuid,
  pub lost_item_id:      Uuid,
  pub found_item_id:     Uuid,
  /// Weighted composite of the three component scores.
  pub score:             f64,
  pub title_score:       f64,
  pub description_score: f64,
  pub category_score:    f64,
  pub status:            MatchStatus,
  pub generated_at:      DateTime<Utc>,
}

impl MatchCandidate {
  pub fn pair(&self) -> (Uuid, Uuid) { (self.lost_item_id, self.found_item_id) }

  /// Apply a review decision, returning the updated candidate.
  ///
  /// Only `pending → confirmed` and `pending → rejected` are accepted;
  /// reviewed candidates are final.
  pub fn review(mut self, to: MatchStatus) -> Result<Self> {
    match (self.status, to) {
      (MatchStatus::Pending, MatchStatus::Confirmed | MatchStatus::Rejected) => {
        self.status = to;
        Ok(self)
      }
      (from, to) => Err(Error::InvalidTransition { id: self.match_id, from, to }),
    }
  }
}
