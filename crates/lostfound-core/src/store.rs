//! The `MatchStore` trait: the engine's only boundary with persistence.
//!
//! The trait is implemented by storage backends (e.g.
//! `lostfound-store-sqlite`). The generation driver and the CLI depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  candidate::{MatchCandidate, MatchStatus},
  item::{FoundItem, ItemStatus, LostItem, NewItem},
};

/// Abstraction over a store of item reports and match candidates.
///
/// Candidates are never deleted. Review decisions change a candidate's
/// status in place; rejected candidates stay for audit.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait MatchStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Item reports ──────────────────────────────────────────────────────

  /// Persist a new lost-item report with status `active`.
  fn add_lost_item(
    &self,
    input: NewItem,
  ) -> impl Future<Output = Result<LostItem, Self::Error>> + Send + '_;

  /// Persist a new found-item report with status `active`.
  fn add_found_item(
    &self,
    input: NewItem,
  ) -> impl Future<Output = Result<FoundItem, Self::Error>> + Send + '_;

  /// List lost items, optionally filtered by status.
  fn list_lost_items(
    &self,
    status: Option<ItemStatus>,
  ) -> impl Future<Output = Result<Vec<LostItem>, Self::Error>> + Send + '_;

  /// List found items, optionally filtered by status.
  fn list_found_items(
    &self,
    status: Option<ItemStatus>,
  ) -> impl Future<Output = Result<Vec<FoundItem>, Self::Error>> + Send + '_;

  /// Admin status change for a lost item. Errors if the item does not exist.
  fn set_lost_status(
    &self,
    id: Uuid,
    status: ItemStatus,
  ) -> impl Future<Output = Result<LostItem, Self::Error>> + Send + '_;

  /// Admin status change for a found item. Errors if the item does not exist.
  fn set_found_status(
    &self,
    id: Uuid,
    status: ItemStatus,
  ) -> impl Future<Output = Result<FoundItem, Self::Error>> + Send + '_;

  // ── Match candidates ──────────────────────────────────────────────────

  /// Every stored candidate, whatever its status.
  fn list_matches(
    &self,
  ) -> impl Future<Output = Result<Vec<MatchCandidate>, Self::Error>> + Send + '_;

  /// Persist newly generated candidates atomically.
  ///
  /// Returns an error, and stores nothing, if any candidate would give its
  /// pair a second live (pending or confirmed) candidate.
  fn insert_matches<'a>(
    &'a self,
    candidates: &'a [MatchCandidate],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Apply a reviewer decision (`confirmed` or `rejected`) to a pending
  /// candidate and return the updated record.
  fn set_match_status(
    &self,
    match_id: Uuid,
    status: MatchStatus,
  ) -> impl Future<Output = Result<MatchCandidate, Self::Error>> + Send + '_;
}
