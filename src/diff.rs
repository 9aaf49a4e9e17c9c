//! # Diff Module
//!
//! This module contains functionality for creating and rendering diffs between original and modified content.
//! It's used in dry-run mode to show what `--fix` would change in each file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Manages diff creation and rendering for license header changes.
///
/// This struct handles:
/// - Generating unified diffs between original and reconciled content
/// - Displaying diffs to stderr with colorization
/// - Appending diffs from every file to a single diff file
pub struct DiffManager {
  /// Whether to show diffs on stderr in dry run mode
  pub show_diff: bool,

  /// Path to save the consolidated diff to in dry run mode
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  /// Creates a new DiffManager with the specified configuration.
  ///
  /// # Parameters
  ///
  /// * `show_diff` - Whether to show diffs in dry run mode
  /// * `save_diff_path` - Path to save the diff to in dry run mode
  ///
  /// # Returns
  ///
  /// A new `DiffManager` instance.
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// True when diffs need to be produced at all.
  pub const fn is_active(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Prepares the save file, truncating leftovers from a previous run so
  /// this run's appends form one coherent diff file.
  ///
  /// # Errors
  ///
  /// Returns an error when the save file cannot be created.
  pub fn init(&self) -> Result<()> {
    if let Some(ref path) = self.save_diff_path {
      std::fs::write(path, "").with_context(|| format!("Failed to create diff file {}", path.display()))?;
    }
    Ok(())
  }

  /// Displays and/or saves a unified diff (3 lines of context) between the
  /// original and reconciled content.
  ///
  /// If `show_diff` is enabled, the diff goes to stderr with `-` lines in
  /// red and `+` lines in green. If `save_diff_path` is set, the diff is
  /// appended there, so one run produces a single consolidated diff file
  /// with a per-file header.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file being checked
  /// * `original` - Original file content
  /// * `new` - Reconciled content with the expected license header
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    if !self.is_active() {
      return Ok(());
    }

    let diff = TextDiff::from_lines(original, new);

    // Collects the plain-text rendition for the diff file.
    let mut diff_content = String::new();
    diff_content.push_str(&format!("Diff for {}:\n", path.display()));

    if self.show_diff {
      eprintln!("Diff for {}:", path.display());
    }

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
      let hunk_header = hunk.header().to_string();

      if self.show_diff {
        eprintln!("{}", hunk_header.if_supports_color(Stream::Stderr, |h| h.dimmed()));
      }
      diff_content.push_str(&hunk_header);
      diff_content.push('\n');

      for change in hunk.iter_changes() {
        let sign = match change.tag() {
          ChangeTag::Delete => "-",
          ChangeTag::Insert => "+",
          ChangeTag::Equal => " ",
        };
        let line = format!("{}{}", sign, change);

        if self.show_diff {
          match change.tag() {
            ChangeTag::Delete => eprint!("{}", line.if_supports_color(Stream::Stderr, |l| l.red())),
            ChangeTag::Insert => eprint!("{}", line.if_supports_color(Stream::Stderr, |l| l.green())),
            ChangeTag::Equal => eprint!("{}", line),
          }
        }

        diff_content.push_str(&line);
      }
    }

    if self.show_diff {
      eprintln!();
    }
    diff_content.push('\n');

    if let Some(ref diff_path) = self.save_diff_path {
      let file_result = OpenOptions::new().create(true).append(true).open(diff_path);

      match file_result {
        Ok(mut file) => {
          if let Err(e) = file.write_all(diff_content.as_bytes()) {
            eprintln!("Error writing to diff file: {}", e);
          }
        }
        Err(e) => {
          eprintln!("Error opening diff file: {}", e);
        }
      }
    }

    Ok(())
  }
}
