//! Item reports: the records the matching engine reads.
//!
//! Lost and found reports share a shape but are distinct types so a lost
//! item can never be passed where a found item is expected. Both are created
//! and mutated by the reporting and admin workflows; the engine only reads
//! them.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle status of a report. Only [`ItemStatus::Active`] reports take part
/// in match generation.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
  #[default]
  Active,
  Resolved,
  Closed,
}

impl ItemStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Resolved => "resolved",
      Self::Closed => "closed",
    }
  }

  pub fn is_active(self) -> bool { matches!(self, Self::Active) }
}

impl fmt::Display for ItemStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ItemStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "active" => Ok(Self::Active),
      "resolved" => Ok(Self::Resolved),
      "closed" => Ok(Self::Closed),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

// ─── Report trait ────────────────────────────────────────────────────────────

/// Read access shared by [`LostItem`] and [`FoundItem`].
pub trait Report {
  fn id(&self) -> Uuid;
  fn title(&self) -> &str;
  fn description(&self) -> &str;
  fn category(&self) -> &str;
  fn status(&self) -> ItemStatus;
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A report of an object someone has lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LostItem {
  pub id:          Uuid,
  pub title:       String,
  pub description: String,
  /// One of the UI's enumerated categories, or free text.
  pub category:    String,
  pub status:      ItemStatus,
  pub created_at:  DateTime<Utc>,
}

/// A report of an object someone has found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundItem {
  pub id:          Uuid,
  pub title:       String,
  pub description: String,
  pub category:    String,
  pub status:      ItemStatus,
  pub created_at:  DateTime<Utc>,
}

macro_rules! impl_report {
  ($ty:ty) => {
    impl Report for $ty {
      fn id(&self) -> Uuid { self.id }

      fn title(&self) -> &str { &self.title }

      fn description(&self) -> &str { &self.description }

      fn category(&self) -> &str { &self.category }

      fn status(&self) -> ItemStatus { self.status }
    }
  };
}

impl_report!(LostItem);
impl_report!(FoundItem);

// ─── NewItem ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::MatchStore::add_lost_item`] and
/// [`crate::store::MatchStore::add_found_item`].
///
/// `id`, `status` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewItem {
  pub title:       String,
  pub description: String,
  pub category:    String,
}

impl NewItem {
  pub fn new(
    title: impl Into<String>,
    description: impl Into<String>,
    category: impl Into<String>,
  ) -> Self {
    Self {
      title:       title.into(),
      description: description.into(),
      category:    category.into(),
    }
  }

  /// Build an active [`LostItem`] with a fresh id, stamped `now`.
  pub fn into_lost(self, now: DateTime<Utc>) -> LostItem {
    LostItem {
      id:          Uuid::new_v4(),
      title:       self.title,
      description: self.description,
      category:    self.category,
      status:      ItemStatus::Active,
      created_at:  now,
    }
  }

  /// Build an active [`FoundItem`] with a fresh id, stamped `now`.
  pub fn into_found(self, now: DateTime<Utc>) -> FoundItem {
    FoundItem {
      id:          Uuid::new_v4(),
      title:       self.title,
      description: self.description,
      category:    self.category,
      status:      ItemStatus::Active,
      created_at:  now,
    }
  }
}
