//! SQL schema for the lost & found SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS lost_items (
    item_id     TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    category    TEXT NOT NULL,
    status      TEXT NOT NULL,   -- 'active' | 'resolved' | 'closed'
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS found_items (
    item_id     TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    category    TEXT NOT NULL,
    status      TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- Candidates are never deleted; rejected rows stay for audit.
CREATE TABLE IF NOT EXISTS matches (
    match_id          TEXT PRIMARY KEY,
    lost_item_id      TEXT NOT NULL REFERENCES lost_items(item_id),
    found_item_id     TEXT NOT NULL REFERENCES found_items(item_id),
    score             REAL NOT NULL,
    title_score       REAL NOT NULL,
    description_score REAL NOT NULL,
    category_score    REAL NOT NULL,
    status            TEXT NOT NULL,   -- 'pending' | 'confirmed' | 'rejected'
    generated_at      TEXT NOT NULL
);

-- At most one live candidate per pair.
CREATE UNIQUE INDEX IF NOT EXISTS matches_live_pair_idx
    ON matches(lost_item_id, found_item_id)
    WHERE status IN ('pending', 'confirmed');

CREATE INDEX IF NOT EXISTS lost_items_status_idx  ON lost_items(status);
CREATE INDEX IF NOT EXISTS found_items_status_idx ON found_items(status);
CREATE INDEX IF NOT EXISTS matches_score_idx      ON matches(score);

PRAGMA user_version = 1;
";
