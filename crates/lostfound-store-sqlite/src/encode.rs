//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs are hyphenated lowercase strings,
//! statuses use their lowercase names.

use chrono::{DateTime, Utc};
use lostfound_core::{
  candidate::{MatchCandidate, MatchStatus},
  item::{FoundItem, ItemStatus, LostItem},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Statuses ────────────────────────────────────────────────────────────────

pub fn decode_item_status(s: &str) -> Result<ItemStatus> { Ok(s.parse()?) }

pub fn decode_match_status(s: &str) -> Result<MatchStatus> { Ok(s.parse()?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `lost_items` or `found_items` row.
pub struct RawItem {
  pub item_id:     String,
  pub title:       String,
  pub description: String,
  pub category:    String,
  pub status:      String,
  pub created_at:  String,
}

impl RawItem {
  /// Column order expected by [`RawItem::from_row`].
  pub const COLUMNS: &'static str =
    "item_id, title, description, category, status, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:     row.get(0)?,
      title:       row.get(1)?,
      description: row.get(2)?,
      category:    row.get(3)?,
      status:      row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_lost(self) -> Result<LostItem> {
    Ok(LostItem {
      id:          decode_uuid(&self.item_id)?,
      status:      decode_item_status(&self.status)?,
      created_at:  decode_dt(&self.created_at)?,
      title:       self.title,
      description: self.description,
      category:    self.category,
    })
  }

  pub fn into_found(self) -> Result<FoundItem> {
    Ok(FoundItem {
      id:          decode_uuid(&self.item_id)?,
      status:      decode_item_status(&self.status)?,
      created_at:  decode_dt(&self.created_at)?,
      title:       self.title,
      description: self.description,
      category:    self.category,
    })
  }
}

/// Raw values read directly from a `matches` row.
pub struct RawMatch {
  pub match_id:          String,
  pub lost_item_id:      String,
  pub found_item_id:     String,
  pub score:             f64,
  pub title_score:       f64,
  pub description_score: f64,
  pub category_score:    f64,
  pub status:            String,
  pub generated_at:      String,
}

impl RawMatch {
  /// Column order expected by [`RawMatch::from_row`].
  pub const COLUMNS: &'static str = "match_id, lost_item_id, found_item_id, score, \
     title_score, description_score, category_score, status, generated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      match_id:          row.get(0)?,
      lost_item_id:      row.get(1)?,
      found_item_id:     row.get(2)?,
      score:             row.get(3)?,
      title_score:       row.get(4)?,
      description_score: row.get(5)?,
      category_score:    row.get(6)?,
      status:            row.get(7)?,
      generated_at:      row.get(8)?,
    })
  }

  pub fn into_candidate(self) -> Result<MatchCandidate> {
    Ok(MatchCandidate {
      match_id:          decode_uuid(&self.match_id)?,
      lost_item_id:      decode_uuid(&self.lost_item_id)?,
      found_item_id:     decode_uuid(&self.found_item_id)?,
      score:             self.score,
      title_score:       self.title_score,
      description_score: self.description_score,
      category_score:    self.category_score,
      status:            decode_match_status(&self.status)?,
      generated_at:      decode_dt(&self.generated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dt_roundtrip_preserves_instant() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }

  #[test]
  fn bad_values_are_errors() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
    assert!(matches!(decode_uuid("not-a-uuid"), Err(Error::Uuid(_))));
    assert!(matches!(decode_item_status("lost"), Err(Error::Core(_))));
    assert!(matches!(decode_match_status("maybe"), Err(Error::Core(_))));
  }
}
