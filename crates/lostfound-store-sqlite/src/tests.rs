//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use lostfound_core::{
  candidate::{MatchCandidate, MatchStatus},
  item::{FoundItem, ItemStatus, LostItem, NewItem},
  store::MatchStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn wallet() -> NewItem {
  NewItem::new(
    "Black Leather Wallet",
    "Lost near library, contains ID card",
    "Bags & Wallets",
  )
}

fn candidate(lost: &LostItem, found: &FoundItem, score: f64) -> MatchCandidate {
  MatchCandidate {
    match_id:          Uuid::new_v4(),
    lost_item_id:      lost.id,
    found_item_id:     found.id,
    score,
    title_score:       score,
    description_score: score,
    category_score:    100.0,
    status:            MatchStatus::Pending,
    generated_at:      Utc::now(),
  }
}

async fn pair(s: &SqliteStore) -> (LostItem, FoundItem) {
  let lost = s.add_lost_item(wallet()).await.unwrap();
  let found = s
    .add_found_item(NewItem::new(
      "Leather Wallet Found",
      "Found near the library entrance",
      "Bags & Wallets",
    ))
    .await
    .unwrap();
  (lost, found)
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_list_items() {
  let s = store().await;

  let lost = s.add_lost_item(wallet()).await.unwrap();
  assert_eq!(lost.status, ItemStatus::Active);

  let listed = s.list_lost_items(None).await.unwrap();
  assert_eq!(listed, vec![lost.clone()]);

  // Lost and found live in separate tables.
  assert!(s.list_found_items(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_items_filtered_by_status() {
  let s = store().await;
  let a = s.add_found_item(wallet()).await.unwrap();
  let b = s.add_found_item(wallet()).await.unwrap();
  s.add_found_item(wallet()).await.unwrap();

  s.set_found_status(a.id, ItemStatus::Resolved).await.unwrap();
  s.set_found_status(b.id, ItemStatus::Closed).await.unwrap();

  let active = s.list_found_items(Some(ItemStatus::Active)).await.unwrap();
  assert_eq!(active.len(), 1);

  let resolved = s.list_found_items(Some(ItemStatus::Resolved)).await.unwrap();
  assert_eq!(resolved.len(), 1);
  assert_eq!(resolved[0].id, a.id);

  assert_eq!(s.list_found_items(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn blank_fields_are_stored_as_given() {
  let s = store().await;
  let lost = s
    .add_lost_item(NewItem::new("Umbrella", "", ""))
    .await
    .unwrap();
  let listed = s.list_lost_items(None).await.unwrap();
  assert_eq!(listed[0].id, lost.id);
  assert_eq!(listed[0].description, "");
}

#[tokio::test]
async fn set_status_on_missing_item_errors() {
  let s = store().await;
  let err = s
    .set_lost_status(Uuid::new_v4(), ItemStatus::Closed)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::ItemNotFound(_)));
}

// ─── Matches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_list_matches() {
  let s = store().await;
  let (lost, found) = pair(&s).await;

  let c = candidate(&lost, &found, 52.0);
  s.insert_matches(std::slice::from_ref(&c)).await.unwrap();

  let all = s.list_matches().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].match_id, c.match_id);
  assert_eq!(all[0].score, 52.0);
  assert_eq!(all[0].status, MatchStatus::Pending);
  assert_eq!(all[0].generated_at, c.generated_at);
}

#[tokio::test]
async fn second_live_match_for_pair_is_rejected_atomically() {
  let s = store().await;
  let (lost, found) = pair(&s).await;
  let other_found = s.add_found_item(wallet()).await.unwrap();

  s.insert_matches(&[candidate(&lost, &found, 52.0)])
    .await
    .unwrap();

  // The first candidate in the batch is fine; the second collides.
  let batch = [
    candidate(&lost, &other_found, 40.0),
    candidate(&lost, &found, 60.0),
  ];
  let err = s.insert_matches(&batch).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::DuplicateLiveMatch { lost: l, found: f } if l == lost.id && f == found.id
  ));

  // Nothing from the failed batch was committed.
  assert_eq!(s.list_matches().await.unwrap().len(), 1);
}

#[tokio::test]
async fn review_transitions() {
  let s = store().await;
  let (lost, found) = pair(&s).await;
  let c = candidate(&lost, &found, 52.0);
  s.insert_matches(std::slice::from_ref(&c)).await.unwrap();

  let confirmed = s
    .set_match_status(c.match_id, MatchStatus::Confirmed)
    .await
    .unwrap();
  assert_eq!(confirmed.status, MatchStatus::Confirmed);
  assert_eq!(s.list_matches().await.unwrap()[0].status, MatchStatus::Confirmed);

  let err = s
    .set_match_status(c.match_id, MatchStatus::Rejected)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(lostfound_core::Error::InvalidTransition { .. })
  ));
}

#[tokio::test]
async fn concurrent_reviews_cannot_overwrite_each_other() {
  let s = store().await;
  let (lost, found) = pair(&s).await;
  let c = candidate(&lost, &found, 52.0);
  s.insert_matches(std::slice::from_ref(&c)).await.unwrap();

  let (confirm, reject) = tokio::join!(
    s.set_match_status(c.match_id, MatchStatus::Confirmed),
    s.set_match_status(c.match_id, MatchStatus::Rejected),
  );

  // Exactly one decision lands; the other sees a reviewed candidate.
  let winner = match (confirm, reject) {
    (Ok(m), Err(crate::Error::Core(lostfound_core::Error::InvalidTransition { .. }))) => m,
    (Err(crate::Error::Core(lostfound_core::Error::InvalidTransition { .. })), Ok(m)) => m,
    (a, b) => panic!("expected one success and one rejected transition, got {a:?} / {b:?}"),
  };

  let stored = s.list_matches().await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].status, winner.status);
}

#[tokio::test]
async fn reviewing_back_to_pending_is_refused() {
  let s = store().await;
  let (lost, found) = pair(&s).await;
  let c = candidate(&lost, &found, 52.0);
  s.insert_matches(std::slice::from_ref(&c)).await.unwrap();

  let err = s
    .set_match_status(c.match_id, MatchStatus::Pending)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(lostfound_core::Error::InvalidTransition { .. })
  ));
  assert_eq!(s.list_matches().await.unwrap()[0].status, MatchStatus::Pending);
}

#[tokio::test]
async fn rejected_matches_are_kept_and_free_the_pair() {
  let s = store().await;
  let (lost, found) = pair(&s).await;
  let first = candidate(&lost, &found, 52.0);
  s.insert_matches(std::slice::from_ref(&first)).await.unwrap();

  s.set_match_status(first.match_id, MatchStatus::Rejected)
    .await
    .unwrap();

  let second = candidate(&lost, &found, 52.0);
  s.insert_matches(std::slice::from_ref(&second)).await.unwrap();

  let all = s.list_matches().await.unwrap();
  assert_eq!(all.len(), 2);
  let rejected = all.iter().find(|m| m.match_id == first.match_id).unwrap();
  assert_eq!(rejected.status, MatchStatus::Rejected);
}

#[tokio::test]
async fn review_missing_match_errors() {
  let s = store().await;
  let err = s
    .set_match_status(Uuid::new_v4(), MatchStatus::Confirmed)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::MatchNotFound(_)));
}

#[tokio::test]
async fn matches_listed_by_score() {
  let s = store().await;
  let (lost, found) = pair(&s).await;
  let other = s.add_found_item(wallet()).await.unwrap();

  s.insert_matches(&[
    candidate(&lost, &found, 35.0),
    candidate(&lost, &other, 80.0),
  ])
  .await
  .unwrap();

  let scores: Vec<f64> = s
    .list_matches()
    .await
    .unwrap()
    .iter()
    .map(|m| m.score)
    .collect();
  assert_eq!(scores, vec![80.0, 35.0]);
}
