//! Layered configuration: optional TOML file, then `LOSTFOUND_*` environment
//! variables.
//!
//! ```toml
//! store_path = "~/.local/share/lostfound/lostfound.db"
//!
//! [matching]
//! threshold = 30
//! title_weight = 0.4
//! description_weight = 0.4
//! category_weight = 0.2
//! require_category_match = false
//! deadline_ms = 5000
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `LOSTFOUND_MATCHING__THRESHOLD=40`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use lostfound_match::MatchSettings;
use serde::Deserialize;

/// Top-level settings for the `lostfound` binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub store_path: PathBuf,
  pub matching:   MatchSettings,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("lostfound.db"),
      matching:   MatchSettings::default(),
    }
  }
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("LOSTFOUND")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut loaded: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    loaded.store_path = expand_tilde(&loaded.store_path);
    Ok(loaded)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let s = Settings::load(Path::new("/nonexistent/lostfound-test.toml")).unwrap();
    assert_eq!(s.matching, MatchSettings::default());
  }

  #[test]
  fn relative_paths_are_untouched() {
    assert_eq!(expand_tilde(Path::new("data/lf.db")), PathBuf::from("data/lf.db"));
  }
}
