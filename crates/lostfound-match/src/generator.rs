//! [`MatchGenerator`]: candidate generation over active lost × found items.
//!
//! Every active pair is scored unless it already has a live candidate. The
//! outer (lost-item) dimension may run on the rayon pool; results are sorted
//! afterwards so the output does not depend on scheduling.

use std::{
  collections::HashSet,
  ops::AddAssign,
  sync::atomic::{AtomicBool, Ordering},
  time::Instant,
};

use chrono::{DateTime, Utc};
use lostfound_core::{
  candidate::{MatchCandidate, MatchStatus},
  item::{FoundItem, LostItem, Report},
};
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{config::MatchConfig, scorer::FieldScorer};

// ─── Output ──────────────────────────────────────────────────────────────────

/// Counters describing one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
  pub active_lost:      usize,
  pub active_found:     usize,
  /// Pairs visited before the run finished or ran out of time.
  pub pairs_considered: usize,
  /// Pairs skipped because a live candidate already exists.
  pub skipped_existing: usize,
  /// Pairs skipped by the opt-in category gate.
  pub skipped_category: usize,
  pub scored:           usize,
  pub below_threshold:  usize,
  /// Scored pairs where at least one required field was blank.
  pub invalid:          usize,
  pub emitted:          usize,
}

impl AddAssign for GenerationStats {
  fn add_assign(&mut self, rhs: Self) {
    self.pairs_considered += rhs.pairs_considered;
    self.skipped_existing += rhs.skipped_existing;
    self.skipped_category += rhs.skipped_category;
    self.scored += rhs.scored;
    self.below_threshold += rhs.below_threshold;
    self.invalid += rhs.invalid;
    self.emitted += rhs.emitted;
  }
}

/// Result of [`MatchGenerator::generate`].
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
  /// New `pending` candidates, highest score first.
  pub candidates: Vec<MatchCandidate>,
  /// Set when the deadline expired before every pair was evaluated.
  pub partial:    bool,
  pub stats:      GenerationStats,
}

/// Candidates and counters for a single lost item's row of the cross-product.
#[derive(Default)]
struct Row {
  candidates: Vec<MatchCandidate>,
  stats:      GenerationStats,
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// Generates match candidates with a fixed, validated configuration.
#[derive(Debug, Clone, Default)]
pub struct MatchGenerator {
  config: MatchConfig,
  scorer: FieldScorer,
}

impl MatchGenerator {
  pub fn new(config: MatchConfig) -> Self {
    let scorer = FieldScorer::new(&config);
    Self { config, scorer }
  }

  pub fn config(&self) -> &MatchConfig { &self.config }

  pub fn scorer(&self) -> &FieldScorer { &self.scorer }

  /// Generate new candidates, stamping them with the current time.
  ///
  /// `existing` is every candidate already on record; pairs with a live
  /// (pending or confirmed) candidate are skipped, so feeding a run's output
  /// back in produces nothing new.
  pub fn generate(
    &self,
    lost: &[LostItem],
    found: &[FoundItem],
    existing: &[MatchCandidate],
  ) -> Generation {
    self.generate_at(lost, found, existing, Utc::now())
  }

  /// As [`generate`](Self::generate), with an explicit `generated_at`.
  pub fn generate_at(
    &self,
    lost: &[LostItem],
    found: &[FoundItem],
    existing: &[MatchCandidate],
    now: DateTime<Utc>,
  ) -> Generation {
    let started = Instant::now();
    let deadline = self.config.deadline().and_then(|d| started.checked_add(d));

    let lost = active_unique(lost, "lost");
    let found = active_unique(found, "found");

    let blocked: HashSet<(Uuid, Uuid)> = existing
      .iter()
      .filter(|m| self.blocks_pair(m.status))
      .map(MatchCandidate::pair)
      .collect();

    tracing::debug!(
      active_lost = lost.len(),
      active_found = found.len(),
      blocked_pairs = blocked.len(),
      threshold = self.config.threshold(),
      parallel = self.config.parallel(),
      "starting match generation"
    );

    let expired = AtomicBool::new(false);
    let row = |l: &&LostItem| self.score_row(l, &found, &blocked, deadline, &expired, now);

    let rows: Vec<Row> = if self.config.parallel() {
      lost.par_iter().map(row).collect()
    } else {
      lost.iter().map(row).collect()
    };

    let mut stats = GenerationStats {
      active_lost: lost.len(),
      active_found: found.len(),
      ..GenerationStats::default()
    };
    let mut candidates = Vec::new();
    for r in rows {
      stats += r.stats;
      candidates.extend(r.candidates);
    }

    candidates.sort_by(|a, b| {
      b.score
        .total_cmp(&a.score)
        .then_with(|| a.pair().cmp(&b.pair()))
    });

    let partial = expired.load(Ordering::Relaxed);
    if partial {
      tracing::warn!(
        evaluated = stats.pairs_considered,
        total = lost.len().saturating_mul(found.len()),
        emitted = stats.emitted,
        "generation deadline exceeded; returning partial result"
      );
    }
    tracing::info!(
      scored = stats.scored,
      emitted = stats.emitted,
      skipped_existing = stats.skipped_existing,
      invalid = stats.invalid,
      elapsed_ms = started.elapsed().as_millis() as u64,
      "match generation finished"
    );

    Generation { candidates, partial, stats }
  }

  fn blocks_pair(&self, status: MatchStatus) -> bool {
    status.is_live()
      || (self.config.suppress_rejected() && status == MatchStatus::Rejected)
  }

  fn score_row(
    &self,
    lost: &LostItem,
    found: &[&FoundItem],
    blocked: &HashSet<(Uuid, Uuid)>,
    deadline: Option<Instant>,
    expired: &AtomicBool,
    now: DateTime<Utc>,
  ) -> Row {
    let mut row = Row::default();

    for f in found {
      if out_of_time(deadline, expired) {
        break;
      }
      row.stats.pairs_considered += 1;

      if blocked.contains(&(lost.id, f.id)) {
        row.stats.skipped_existing += 1;
        continue;
      }
      if self.config.require_category_match() && !self.scorer.categories_match(lost, *f) {
        row.stats.skipped_category += 1;
        continue;
      }

      let breakdown = self.scorer.score(lost, f);
      row.stats.scored += 1;
      if !breakdown.is_clean() {
        row.stats.invalid += 1;
        tracing::trace!(
          lost = %lost.id,
          found = %f.id,
          issues = ?breakdown.issues,
          "scored pair with blank fields"
        );
      }

      if breakdown.composite < self.config.threshold() {
        row.stats.below_threshold += 1;
        continue;
      }

      row.stats.emitted += 1;
      row.candidates.push(MatchCandidate {
        match_id:          Uuid::new_v4(),
        lost_item_id:      lost.id,
        found_item_id:     f.id,
        score:             breakdown.composite,
        title_score:       breakdown.title,
        description_score: breakdown.description,
        category_score:    breakdown.category,
        status:            MatchStatus::Pending,
        generated_at:      now,
      });
    }

    row
  }
}

/// Active records only, first occurrence of each id kept.
fn active_unique<'a, T: Report>(items: &'a [T], side: &'static str) -> Vec<&'a T> {
  let mut seen = HashSet::with_capacity(items.len());
  items
    .iter()
    .filter(|item| item.status().is_active())
    .filter(|item| {
      let first = seen.insert(item.id());
      if !first {
        tracing::warn!(side, id = %item.id(), "duplicate item id in input; keeping first");
      }
      first
    })
    .collect()
}

/// Check the deadline, latching `expired` so other workers stop promptly.
fn out_of_time(deadline: Option<Instant>, expired: &AtomicBool) -> bool {
  let Some(deadline) = deadline else {
    return false;
  };
  if expired.load(Ordering::Relaxed) {
    return true;
  }
  if Instant::now() >= deadline {
    expired.store(true, Ordering::Relaxed);
    return true;
  }
  false
}
