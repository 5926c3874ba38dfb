//! The "Generate Matches" action against a [`MatchStore`].
//!
//! Reads the snapshot, runs the pure generator, then writes the new
//! candidates. No store access happens while pairs are being scored.

use lostfound_core::{item::ItemStatus, store::MatchStore};

use crate::generator::{Generation, MatchGenerator};

/// Read active items and existing matches from `store`, generate, and persist
/// the new candidates. Returns the full generation result.
pub async fn run_generation<S: MatchStore>(
  store: &S,
  generator: &MatchGenerator,
) -> Result<Generation, S::Error> {
  let lost = store.list_lost_items(Some(ItemStatus::Active)).await?;
  let found = store.list_found_items(Some(ItemStatus::Active)).await?;
  let existing = store.list_matches().await?;

  let generation = generator.generate(&lost, &found, &existing);

  if !generation.candidates.is_empty() {
    store.insert_matches(&generation.candidates).await?;
  }

  tracing::info!(
    persisted = generation.candidates.len(),
    partial = generation.partial,
    "generated matches persisted"
  );

  Ok(generation)
}
