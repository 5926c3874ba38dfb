//! Error type for `lostfound-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] lostfound_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("item not found: {0}")]
  ItemNotFound(uuid::Uuid),

  #[error("match not found: {0}")]
  MatchNotFound(uuid::Uuid),

  /// Inserting would give a pair a second pending or confirmed candidate.
  #[error("pair ({lost}, {found}) already has a live match")]
  DuplicateLiveMatch { lost: uuid::Uuid, found: uuid::Uuid },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
