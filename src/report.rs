//! # Report Module
//!
//! This module captures the outcome of a scan for machine consumption.
//!
//! Every scanned file (and the standalone license check) produces a
//! [`FileReport`]; the [`RunSummary`] totals them up and drives the exit
//! status. `--report-json` serializes both into one pretty-printed JSON
//! document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Outcome recorded for a single scanned file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
  /// Display path, relative to the scan root.
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// What the scan concluded or did.
  pub action: FileAction,
  /// Extra information: skip reason or error message.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,
}

impl FileReport {
  /// Creates a report with no detail text.
  pub const fn new(path: PathBuf, action: FileAction) -> Self {
    Self {
      path,
      action,
      detail: None,
    }
  }

  /// Creates a report carrying a detail message.
  pub fn with_detail(path: PathBuf, action: FileAction, detail: impl Into<String>) -> Self {
    Self {
      path,
      action,
      detail: Some(detail.into()),
    }
  }
}

/// Per-file outcome categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileAction {
  /// The expected license header is present.
  Matched,
  /// The header is missing or stale; a dry run leaves it untouched.
  NeedsFix,
  /// The file was rewritten with the expected header.
  Fixed,
  /// The file was not checked (no grammar, ignored, and so on).
  Skipped,
  /// The file could not be processed.
  Error,
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  /// Total number of reports (files plus the standalone check).
  pub total: usize,
  /// Files whose header already matched.
  pub matched: usize,
  /// Files needing a fix (dry run only; fix mode turns these into `fixed`).
  pub needs_fix: usize,
  /// Files rewritten in fix mode.
  pub fixed: usize,
  /// Files skipped.
  pub skipped: usize,
  /// Files that failed outright.
  pub errors: usize,
  /// Whether the run was allowed to rewrite files.
  pub fix_mode: bool,
  /// Wall-clock duration of the scan.
  #[serde(skip_serializing)]
  pub duration: Duration,
  /// Scan duration in milliseconds, for serialization.
  #[serde(rename = "duration_ms")]
  pub duration_ms: u64,
  /// Unix timestamp when the summary was produced.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<i64>,
}

impl RunSummary {
  /// Tallies a slice of reports.
  pub fn from_reports(reports: &[FileReport], fix_mode: bool, duration: Duration) -> Self {
    let mut summary = Self {
      total: reports.len(),
      matched: 0,
      needs_fix: 0,
      fixed: 0,
      skipped: 0,
      errors: 0,
      fix_mode,
      duration,
      duration_ms: duration.as_millis() as u64,
      timestamp: Some(Local::now().timestamp()),
    };

    for report in reports {
      match report.action {
        FileAction::Matched => summary.matched += 1,
        FileAction::NeedsFix => summary.needs_fix += 1,
        FileAction::Fixed => summary.fixed += 1,
        FileAction::Skipped => summary.skipped += 1,
        FileAction::Error => summary.errors += 1,
      }
    }

    summary
  }

  /// True when nothing needs fixing and nothing failed.
  ///
  /// This is what decides the exit status of a run.
  pub const fn is_clean(&self) -> bool {
    self.needs_fix == 0 && self.errors == 0
  }
}

/// Writes the `{ summary, files }` JSON report.
///
/// # Parameters
///
/// * `output_path` - Where the report file goes
/// * `files` - Per-file reports, in display order
/// * `summary` - Run totals
///
/// # Errors
///
/// Returns an error when serialization fails or the file cannot be written.
pub fn write_json_report(output_path: &Path, files: &[FileReport], summary: &RunSummary) -> Result<()> {
  let report = serde_json::json!({
    "summary": summary,
    "files": files,
  });

  let content = serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")?;

  fs::write(output_path, content).with_context(|| format!("Failed to write report to {}", output_path.display()))
}
