//! Normalized edit-distance similarity.
//!
//! Strings are compared over Unicode scalar values after lowercasing, so
//! `"Wallet"` and `"wallet"` are identical and a non-ASCII character counts
//! as one edit, not several bytes. Lengths used for normalization are taken
//! from the same lowercased sequences as the distance.

/// Lowercase `s` into a vector of scalar values.
fn fold(s: &str) -> Vec<char> { s.chars().flat_map(char::to_lowercase).collect() }

/// Levenshtein distance between two char sequences using a single rolling
/// row. The shorter sequence is placed on the row axis.
fn distance(a: &[char], b: &[char]) -> usize {
  if a.is_empty() {
    return b.len();
  }
  if b.is_empty() {
    return a.len();
  }

  let (row_axis, col_axis) = if a.len() <= b.len() { (a, b) } else { (b, a) };
  let mut row: Vec<usize> = (0..=row_axis.len()).collect();

  for (i, &c) in col_axis.iter().enumerate() {
    let mut diag = row[0];
    row[0] = i + 1;

    for (j, &r) in row_axis.iter().enumerate() {
      let substitution = diag + usize::from(c != r);
      let deletion = row[j + 1] + 1;
      let insertion = row[j] + 1;

      diag = row[j + 1];
      row[j + 1] = substitution.min(deletion).min(insertion);
    }
  }

  row[row_axis.len()]
}

/// Case-insensitive Levenshtein distance: the minimum number of single
/// character insertions, deletions or substitutions turning `a` into `b`.
pub fn levenshtein(a: &str, b: &str) -> usize { distance(&fold(a), &fold(b)) }

/// Similarity in `[0, 1]`: `1 - distance / max(len(a), len(b))`.
///
/// Two empty strings are identical (1.0); an empty string against a
/// non-empty one scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
  let a = fold(a);
  let b = fold(b);

  let longest = a.len().max(b.len());
  if longest == 0 {
    return 1.0;
  }

  let d = distance(&a, &b);
  (1.0 - d as f64 / longest as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  const EPS: f64 = 1e-9;

  #[test]
  fn classic_distances() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("flaw", "lawn"), 2);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("abc", ""), 3);
    assert_eq!(levenshtein("", ""), 0);
  }

  #[test]
  fn kitten_sitting_similarity() {
    let s = similarity("kitten", "sitting");
    assert!((s - (1.0 - 3.0 / 7.0)).abs() < EPS, "got {s}");
  }

  #[test]
  fn identity_is_one() {
    for x in ["", "a", "Black Leather Wallet", "café crème", "鍵と財布"] {
      assert_eq!(similarity(x, x), 1.0, "similarity({x:?}, {x:?})");
    }
  }

  #[test]
  fn empty_against_non_empty_is_zero() {
    assert_eq!(similarity("", "abc"), 0.0);
    assert_eq!(similarity("abc", ""), 0.0);
  }

  #[test]
  fn symmetric() {
    let pairs = [
      ("Black Leather Wallet", "Leather Wallet Found"),
      ("umbrella", "Umbrela"),
      ("gold ring", ""),
      ("Schlüssel", "Schluessel"),
    ];
    for (a, b) in pairs {
      assert!((similarity(a, b) - similarity(b, a)).abs() < EPS, "{a:?} vs {b:?}");
      assert_eq!(levenshtein(a, b), levenshtein(b, a));
    }
  }

  #[test]
  fn case_insensitive() {
    assert_eq!(similarity("BLUE BACKPACK", "blue backpack"), 1.0);
    assert_eq!(levenshtein("Ärger", "ärger"), 0);
  }

  #[test]
  fn counts_code_points_not_bytes() {
    // "é" is two bytes in UTF-8 but a single substitution here.
    assert_eq!(levenshtein("cafe", "café"), 1);
    assert!((similarity("cafe", "café") - 0.75).abs() < EPS);
    assert_eq!(levenshtein("鍵", "傘"), 1);
  }

  #[test]
  fn stays_in_unit_interval() {
    let s = similarity("Gold Ring", "Umbrella");
    assert!((0.0..=1.0).contains(&s));
    assert_eq!(s, 0.0);
  }

  #[test]
  fn long_inputs() {
    let a = "a".repeat(500);
    let b = format!("{}b", "a".repeat(499));
    assert_eq!(levenshtein(&a, &b), 1);
    assert!((similarity(&a, &b) - (1.0 - 1.0 / 500.0)).abs() < EPS);
  }
}
