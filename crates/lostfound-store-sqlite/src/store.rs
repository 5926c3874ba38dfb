//! [`SqliteStore`]: the SQLite implementation of [`MatchStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use lostfound_core::{
  candidate::{MatchCandidate, MatchStatus},
  item::{FoundItem, ItemStatus, LostItem, NewItem},
  store::MatchStore,
};

use crate::{
  Error, Result,
  encode::{RawItem, RawMatch, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const LOST_TABLE: &str = "lost_items";
const FOUND_TABLE: &str = "found_items";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A match store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used in tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_item(&self, table: &'static str, raw: RawItem) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO {table} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            RawItem::COLUMNS
          ),
          rusqlite::params![
            raw.item_id,
            raw.title,
            raw.description,
            raw.category,
            raw.status,
            raw.created_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_items(
    &self,
    table: &'static str,
    status: Option<ItemStatus>,
  ) -> Result<Vec<RawItem>> {
    let status_str = status.map(ItemStatus::as_str);

    let raws = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM {table}
           WHERE (?1 IS NULL OR status = ?1)
           ORDER BY created_at, item_id",
          RawItem::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![status_str], RawItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws)
  }

  /// Update an item's status and return the updated row, or `None` if the
  /// item does not exist.
  async fn update_item_status(
    &self,
    table: &'static str,
    id: Uuid,
    status: ItemStatus,
  ) -> Result<Option<RawItem>> {
    let id_str = encode_uuid(id);
    let status_str = status.as_str();

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          &format!("UPDATE {table} SET status = ?1 WHERE item_id = ?2"),
          rusqlite::params![status_str, id_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM {table} WHERE item_id = ?1",
                RawItem::COLUMNS
              ),
              rusqlite::params![id_str],
              RawItem::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }
}

fn raw_item(
  id: Uuid,
  input: NewItem,
  status: ItemStatus,
  created_at: chrono::DateTime<Utc>,
) -> RawItem {
  RawItem {
    item_id:     encode_uuid(id),
    title:       input.title,
    description: input.description,
    category:    input.category,
    status:      status.as_str().to_owned(),
    created_at:  encode_dt(created_at),
  }
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  // ── Item reports ──────────────────────────────────────────────────────────

  async fn add_lost_item(&self, input: NewItem) -> Result<LostItem> {
    let item = input.clone().into_lost(Utc::now());
    self
      .insert_item(LOST_TABLE, raw_item(item.id, input, item.status, item.created_at))
      .await?;
    Ok(item)
  }

  async fn add_found_item(&self, input: NewItem) -> Result<FoundItem> {
    let item = input.clone().into_found(Utc::now());
    self
      .insert_item(FOUND_TABLE, raw_item(item.id, input, item.status, item.created_at))
      .await?;
    Ok(item)
  }

  async fn list_lost_items(&self, status: Option<ItemStatus>) -> Result<Vec<LostItem>> {
    self
      .list_items(LOST_TABLE, status)
      .await?
      .into_iter()
      .map(RawItem::into_lost)
      .collect()
  }

  async fn list_found_items(&self, status: Option<ItemStatus>) -> Result<Vec<FoundItem>> {
    self
      .list_items(FOUND_TABLE, status)
      .await?
      .into_iter()
      .map(RawItem::into_found)
      .collect()
  }

  async fn set_lost_status(&self, id: Uuid, status: ItemStatus) -> Result<LostItem> {
    match self.update_item_status(LOST_TABLE, id, status).await? {
      Some(raw) => raw.into_lost(),
      None      => Err(Error::ItemNotFound(id)),
    }
  }

  async fn set_found_status(&self, id: Uuid, status: ItemStatus) -> Result<FoundItem> {
    match self.update_item_status(FOUND_TABLE, id, status).await? {
      Some(raw) => raw.into_found(),
      None      => Err(Error::ItemNotFound(id)),
    }
  }

  // ── Match candidates ──────────────────────────────────────────────────────

  async fn list_matches(&self) -> Result<Vec<MatchCandidate>> {
    let raws: Vec<RawMatch> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM matches
           ORDER BY score DESC, lost_item_id, found_item_id, generated_at",
          RawMatch::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawMatch::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatch::into_candidate).collect()
  }

  async fn insert_matches(&self, candidates: &[MatchCandidate]) -> Result<()> {
    let rows: Vec<_> = candidates
      .iter()
      .map(|c| {
        (
          encode_uuid(c.match_id),
          encode_uuid(c.lost_item_id),
          encode_uuid(c.found_item_id),
          c.score,
          c.title_score,
          c.description_score,
          c.category_score,
          c.status.as_str(),
          encode_dt(c.generated_at),
        )
      })
      .collect();
    let count = rows.len();

    // The first pair that already has a live candidate, if any. Nothing is
    // committed in that case.
    let conflict: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut live = tx.prepare(
            "SELECT 1 FROM matches
             WHERE lost_item_id = ?1 AND found_item_id = ?2
               AND status IN ('pending', 'confirmed')",
          )?;
          let mut insert = tx.prepare(&format!(
            "INSERT INTO matches ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            RawMatch::COLUMNS
          ))?;

          for row in &rows {
            let is_live = matches!(row.7, "pending" | "confirmed");
            if is_live && live.exists(rusqlite::params![row.1, row.2])? {
              return Ok(Some((row.1.clone(), row.2.clone())));
            }
            insert.execute(rusqlite::params![
              row.0, row.1, row.2, row.3, row.4, row.5, row.6, row.7, row.8,
            ])?;
          }
        }
        tx.commit()?;
        Ok(None)
      })
      .await?;

    if let Some((lost, found)) = conflict {
      return Err(Error::DuplicateLiveMatch {
        lost:  Uuid::parse_str(&lost)?,
        found: Uuid::parse_str(&found)?,
      });
    }

    tracing::debug!(count, "inserted match candidates");
    Ok(())
  }

  async fn set_match_status(
    &self,
    match_id: Uuid,
    status: MatchStatus,
  ) -> Result<MatchCandidate> {
    let id_str = encode_uuid(match_id);
    let status_str = status.as_str();
    let terminal = matches!(status, MatchStatus::Confirmed | MatchStatus::Rejected);

    // Row as it was before this review; read and guarded write share one
    // transaction.
    let before: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let raw = tx
          .query_row(
            &format!("SELECT {} FROM matches WHERE match_id = ?1", RawMatch::COLUMNS),
            rusqlite::params![id_str],
            RawMatch::from_row,
          )
          .optional()?;
        if raw.is_some() && terminal {
          tx.execute(
            "UPDATE matches SET status = ?1 WHERE match_id = ?2 AND status = 'pending'",
            rusqlite::params![status_str, id_str],
          )?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    let current = before
      .ok_or(Error::MatchNotFound(match_id))?
      .into_candidate()?;
    let updated = current.review(status)?;

    tracing::info!(%match_id, %status, "match reviewed");
    Ok(updated)
  }
}
