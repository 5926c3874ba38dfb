//! Error types for `lostfound-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::candidate::MatchStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("match {id} cannot move from {from} to {to}")]
  InvalidTransition {
    id:   Uuid,
    from: MatchStatus,
    to:   MatchStatus,
  },

  #[error("unknown status value: {0:?}")]
  UnknownStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
