//! Intake adapter: raw report JSON → typed [`NewItem`]s.
//!
//! Reports exported from the web API are loosely shaped: fields can be
//! missing, `null`, or numbers. They are coerced here so the engine only
//! ever sees strict records. Anything that had to be coerced is logged.

use lostfound_core::item::{ItemStatus, NewItem};
use serde::Deserialize;
use serde_json::Value;

/// An import file: `{ "lost": [...], "found": [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
  #[serde(default)]
  pub lost:  Vec<RawReport>,
  #[serde(default)]
  pub found: Vec<RawReport>,
}

/// One report as it arrives from the API.
#[derive(Debug, Default, Deserialize)]
pub struct RawReport {
  #[serde(default)]
  pub title:       Option<Value>,
  #[serde(default)]
  pub description: Option<Value>,
  #[serde(default)]
  pub category:    Option<Value>,
  #[serde(default)]
  pub status:      Option<Value>,
}

/// A coerced report ready for the store.
#[derive(Debug, Clone)]
pub struct Intake {
  pub item:   NewItem,
  pub status: ItemStatus,
}

impl RawReport {
  /// Coerce into a strict record. `index` is only used in log messages.
  pub fn coerce(self, side: &'static str, index: usize) -> Intake {
    let item = NewItem {
      title:       text_field(self.title, side, index, "title"),
      description: text_field(self.description, side, index, "description"),
      category:    text_field(self.category, side, index, "category"),
    };

    let status = match self.status {
      None | Some(Value::Null) => ItemStatus::Active,
      Some(Value::String(s)) => s.trim().to_lowercase().parse().unwrap_or_else(|_| {
        tracing::warn!(side, index, status = %s, "unknown status; importing as active");
        ItemStatus::Active
      }),
      Some(other) => {
        tracing::warn!(side, index, status = %other, "non-string status; importing as active");
        ItemStatus::Active
      }
    };

    Intake { item, status }
  }
}

fn text_field(
  value: Option<Value>,
  side: &'static str,
  index: usize,
  field: &'static str,
) -> String {
  match value {
    Some(Value::String(s)) => s,
    Some(Value::Number(n)) => n.to_string(),
    Some(Value::Bool(b)) => b.to_string(),
    None | Some(Value::Null) => {
      tracing::warn!(side, index, field, "missing field; importing as empty");
      String::new()
    }
    Some(other) => {
      tracing::warn!(
        side,
        index,
        field,
        kind = json_kind(&other),
        "structured value; importing as empty"
      );
      String::new()
    }
  }
}

fn json_kind(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn well_formed_report() {
    let raw: RawReport = serde_json::from_str(
      r#"{"title":"Black Leather Wallet","description":"Near library",
          "category":"Bags & Wallets"}"#,
    )
    .unwrap();
    let intake = raw.coerce("lost", 0);
    assert_eq!(intake.item.title, "Black Leather Wallet");
    assert_eq!(intake.item.category, "Bags & Wallets");
    assert_eq!(intake.status, ItemStatus::Active);
  }

  #[test]
  fn missing_and_odd_fields_are_coerced() {
    let raw: RawReport = serde_json::from_str(
      r#"{"title":12345,"description":null,"category":["a"],"status":"Resolved"}"#,
    )
    .unwrap();
    let intake = raw.coerce("found", 3);
    assert_eq!(intake.item.title, "12345");
    assert_eq!(intake.item.description, "");
    assert_eq!(intake.item.category, "");
    assert_eq!(intake.status, ItemStatus::Resolved);
  }

  #[test]
  fn unknown_status_falls_back_to_active() {
    let raw: RawReport = serde_json::from_str(r#"{"title":"Keys","status":"misplaced"}"#).unwrap();
    assert_eq!(raw.coerce("lost", 0).status, ItemStatus::Active);
  }

  #[test]
  fn snapshot_sides_default_to_empty() {
    let snap: Snapshot = serde_json::from_str(r#"{"found":[{"title":"Umbrella"}]}"#).unwrap();
    assert!(snap.lost.is_empty());
    assert_eq!(snap.found.len(), 1);
  }
}
