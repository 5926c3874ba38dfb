//! `lostfound`: command-line driver for the lost & found matching engine.
//!
//! # Usage
//!
//! ```text
//! lostfound import reports.json
//! lostfound generate
//! lostfound matches --status pending
//! lostfound review <MATCH_ID> confirm
//! lostfound status lost <ITEM_ID> resolved
//! ```
//!
//! Reads `lostfound.toml` (or the path given with `--config`) and
//! `LOSTFOUND_*` environment variables; see [`settings`].

mod intake;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use lostfound_core::{
  candidate::MatchStatus,
  item::ItemStatus,
  store::MatchStore,
};
use lostfound_match::{MatchConfig, MatchGenerator, run_generation};
use lostfound_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::{intake::Snapshot, settings::Settings};

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Lost & found item matching")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "lostfound.toml")]
  config: PathBuf,

  /// SQLite database path; overrides `store_path` from the config.
  #[arg(long)]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Import lost and found reports from a JSON file.
  Import {
    /// File shaped `{ "lost": [...], "found": [...] }`.
    file: PathBuf,
  },
  /// Score active lost × found reports and store new candidates.
  Generate {
    /// Override the configured threshold (0–100).
    #[arg(long)]
    threshold: Option<f64>,
    /// Override the configured deadline, in milliseconds.
    #[arg(long)]
    deadline_ms: Option<u64>,
    /// Print candidates without storing them.
    #[arg(long)]
    dry_run: bool,
  },
  /// List stored candidates.
  Matches {
    #[arg(long)]
    status: Option<MatchStatus>,
  },
  /// Confirm or reject a pending candidate.
  Review {
    match_id: Uuid,
    decision: Decision,
  },
  /// Change a report's status.
  Status {
    side:    Side,
    item_id: Uuid,
    status:  ItemStatus,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum Decision {
  Confirm,
  Reject,
}

impl From<Decision> for MatchStatus {
  fn from(d: Decision) -> Self {
    match d {
      Decision::Confirm => MatchStatus::Confirmed,
      Decision::Reject => MatchStatus::Rejected,
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
  Lost,
  Found,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let mut settings = Settings::load(&cli.config)?;
  if let Some(store) = cli.store {
    settings.store_path = store;
  }

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  match cli.command {
    Command::Import { file } => import(&store, &file).await,
    Command::Generate { threshold, deadline_ms, dry_run } => {
      let mut matching = settings.matching;
      if let Some(t) = threshold {
        matching.threshold = t;
      }
      if deadline_ms.is_some() {
        matching.deadline_ms = deadline_ms;
      }
      let config = MatchConfig::try_from(matching).context("invalid matching configuration")?;
      generate(&store, MatchGenerator::new(config), dry_run).await
    }
    Command::Matches { status } => {
      let matches = store.list_matches().await.context("failed to list matches")?;
      let matches: Vec<_> = matches
        .into_iter()
        .filter(|m| status.is_none_or(|s| m.status == s))
        .collect();
      print_json(&matches)
    }
    Command::Review { match_id, decision } => {
      let updated = store
        .set_match_status(match_id, decision.into())
        .await
        .with_context(|| format!("failed to review match {match_id}"))?;
      print_json(&updated)
    }
    Command::Status { side, item_id, status } => {
      match side {
        Side::Lost => print_json(
          &store
            .set_lost_status(item_id, status)
            .await
            .with_context(|| format!("failed to update lost item {item_id}"))?,
        ),
        Side::Found => print_json(
          &store
            .set_found_status(item_id, status)
            .await
            .with_context(|| format!("failed to update found item {item_id}"))?,
        ),
      }
    }
  }
}

// ─── Commands ────────────────────────────────────────────────────────────────

async fn import(store: &SqliteStore, file: &std::path::Path) -> anyhow::Result<()> {
  let raw = std::fs::read_to_string(file)
    .with_context(|| format!("reading import file {}", file.display()))?;
  let snapshot: Snapshot = serde_json::from_str(&raw).context("parsing import file")?;

  let (mut lost, mut found) = (0usize, 0usize);

  for (index, report) in snapshot.lost.into_iter().enumerate() {
    let intake = report.coerce("lost", index);
    let item = store
      .add_lost_item(intake.item)
      .await
      .context("failed to store lost item")?;
    if intake.status != ItemStatus::Active {
      store
        .set_lost_status(item.id, intake.status)
        .await
        .context("failed to set lost item status")?;
    }
    lost += 1;
  }

  for (index, report) in snapshot.found.into_iter().enumerate() {
    let intake = report.coerce("found", index);
    let item = store
      .add_found_item(intake.item)
      .await
      .context("failed to store found item")?;
    if intake.status != ItemStatus::Active {
      store
        .set_found_status(item.id, intake.status)
        .await
        .context("failed to set found item status")?;
    }
    found += 1;
  }

  tracing::info!(lost, found, "import complete");
  Ok(())
}

async fn generate(
  store: &SqliteStore,
  generator: MatchGenerator,
  dry_run: bool,
) -> anyhow::Result<()> {
  let generation = if dry_run {
    let lost = store.list_lost_items(Some(ItemStatus::Active)).await?;
    let found = store.list_found_items(Some(ItemStatus::Active)).await?;
    let existing = store.list_matches().await?;
    generator.generate(&lost, &found, &existing)
  } else {
    run_generation(store, &generator)
      .await
      .context("match generation failed")?
  };

  print_json(&generation)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
