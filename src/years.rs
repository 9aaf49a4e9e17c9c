//! # Year Overrides Module
//!
//! Per-file copyright start-year overrides. Some files predate the history
//! the classifier can see (imports, renames), so operators can pin their
//! start year explicitly; a pinned year takes precedence over whatever year
//! the header engine extracts from existing comments.
//!
//! Overrides come from the `--years` option — either a path to a file of
//! `path:year` lines or an inline comma-separated list of the same entries —
//! or from the `[years]` table of the configuration file. Lookups use the
//! file's path relative to the scan root, with forward slashes.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Errors from parsing year overrides.
#[derive(Debug, Error)]
pub enum YearsError {
  #[error("invalid years entry \"{0}\": expected path:year")]
  MalformedEntry(String),

  #[error("invalid years entry \"{entry}\": \"{year}\" is not a plausible 4-digit year")]
  ImplausibleYear { entry: String, year: String },

  #[error("failed to read years file \"{path}\": {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Map from root-relative path to pinned copyright start year.
#[derive(Debug, Clone, Default)]
pub struct YearMap {
  entries: HashMap<String, i32>,
}

impl YearMap {
  /// Builds a map from a `--years` specification.
  ///
  /// A spec naming an existing file is read line by line (blank lines and
  /// `#` comments are skipped); any other spec is split on commas. Each
  /// entry must be `path:year`.
  pub fn from_spec(spec: &str) -> Result<Self, YearsError> {
    let is_file = fs::metadata(spec).map(|meta| meta.is_file()).unwrap_or(false);
    if is_file {
      let contents = fs::read_to_string(spec).map_err(|source| YearsError::Io {
        path: spec.to_string(),
        source,
      })?;
      Self::from_entries(contents.lines())
    } else {
      Self::from_entries(spec.split(','))
    }
  }

  /// Builds a map from individual `path:year` entries.
  pub fn from_entries<'a>(entries: impl Iterator<Item = &'a str>) -> Result<Self, YearsError> {
    let mut map = Self::default();
    for entry in entries {
      let trimmed = entry.trim();
      if trimmed.is_empty() || trimmed.starts_with('#') {
        continue;
      }
      let (path, year) = trimmed.rsplit_once(':').ok_or_else(|| YearsError::MalformedEntry(trimmed.to_string()))?;
      let year = parse_year(trimmed, year)?;
      map.pin(path, year);
    }
    Ok(map)
  }

  /// Pins one path to a start year. Later pins win, matching how CLI
  /// entries override configuration entries.
  pub fn pin(&mut self, path: &str, year: i32) {
    self.entries.insert(normalize_key(path.trim()), year);
  }

  /// Merges `other` on top of this map.
  pub fn extend(&mut self, other: Self) {
    self.entries.extend(other.entries);
  }

  /// Pinned year for a root-relative path, if any.
  pub fn year_for(&self, relative: &Path) -> Option<i32> {
    let key = normalize_key(&relative.to_string_lossy());
    self.entries.get(&key).copied()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}

/// Validates a year string from an entry. Mirrors the range the header
/// engine treats as a plausible copyright year.
fn parse_year(entry: &str, year: &str) -> Result<i32, YearsError> {
  let parsed: i32 = year.trim().parse().map_err(|_| YearsError::ImplausibleYear {
    entry: entry.to_string(),
    year: year.trim().to_string(),
  })?;
  if !(1000..=2999).contains(&parsed) {
    return Err(YearsError::ImplausibleYear {
      entry: entry.to_string(),
      year: year.trim().to_string(),
    });
  }
  Ok(parsed)
}

/// Keys and lookups use forward slashes so entries written on any platform
/// match paths walked on any platform.
fn normalize_key(raw: &str) -> String {
  raw.replace('\\', "/")
}
