//! # Output Module
//!
//! This module centralizes all user-facing output for the lichen tool.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! ## Design Goals
//!
//! - **Informative**: Show actionable information without requiring flags
//! - **Scannable**: Use formatting to make output easy to parse visually
//! - **Progressive**: More detail with `-v`, silence with `-q`
//! - **Scriptable**: Keep stdout predictable for piping/automation

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileReport, RunSummary};

/// Symbols used in output
pub mod symbols {
  /// Header present / file fixed successfully
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Header missing or stale / processing failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Skipped file (verbose mode)
  pub const SKIPPED: &str = "-";
  /// File rewritten
  pub const FIXED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Checking N files..." or "Processing N files..." message.
///
/// - In fix mode: "Processing N files..."
/// - In dry-run mode: "Checking N files..."
pub fn print_start_message(file_count: usize, fix_mode: bool) {
  if is_quiet() {
    return;
  }

  let verb = if fix_mode { "Processing" } else { "Checking" };
  let files_word = if file_count == 1 { "file" } else { "files" };

  println!("{} {} {}...", verb, file_count, files_word);
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the list of files whose headers are missing or stale.
///
/// Shows up to `DEFAULT_FILE_LIST_LIMIT` files; in verbose mode, shows all.
/// In quiet mode, prints bare paths only, for scripting.
/// Files are sorted alphabetically by path.
pub fn print_needs_fix_files(files: &[&FileReport]) {
  if files.is_empty() {
    return;
  }

  let mut sorted_files: Vec<_> = files.to_vec();
  sorted_files.sort_by(|a, b| a.path.cmp(&b.path));

  if is_quiet() {
    for file in &sorted_files {
      println!("{}", file.path.display());
    }
    return;
  }

  let count = sorted_files.len();
  let header = format!(
    "{} {} {} {} a license header fix:",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    count,
    if count == 1 { "file" } else { "files" },
    if count == 1 { "needs" } else { "need" }
  );
  println!("{}", header);

  let show_all = is_verbose();
  let effective_limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in sorted_files.iter().take(effective_limit) {
    println!("  {}", file.path.display());
  }

  if !show_all && count > effective_limit {
    let remaining = count - effective_limit;
    println!(
      "  {} ... and {} more (use -v to see all)",
      "".if_supports_color(Stream::Stdout, |s| s.dimmed()),
      remaining
    );
  }
}

/// Print the list of files that were rewritten with the expected header.
pub fn print_fixed_files(files: &[&FileReport]) {
  if is_quiet() || files.is_empty() {
    return;
  }

  let mut sorted_files: Vec<_> = files.to_vec();
  sorted_files.sort_by(|a, b| a.path.cmp(&b.path));

  let count = sorted_files.len();
  let header = format!(
    "{} Fixed license header in {} {}:",
    symbols::FIXED.if_supports_color(Stream::Stdout, |s| s.blue()),
    count,
    if count == 1 { "file" } else { "files" }
  );
  println!("{}", header);

  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in sorted_files.iter().take(limit) {
    println!("  {}", file.path.display());
  }

  if !show_all && count > limit {
    let remaining = count - limit;
    println!(
      "  {} ... and {} more (use -v to see all)",
      "".if_supports_color(Stream::Stdout, |s| s.dimmed()),
      remaining
    );
  }
}

/// Print the list of skipped files with their reasons.
///
/// Only shown in verbose mode; skips are routine and would drown the
/// interesting output otherwise.
pub fn print_skipped_files(files: &[&FileReport]) {
  if !is_verbose() || files.is_empty() {
    return;
  }

  let mut sorted_files: Vec<_> = files.to_vec();
  sorted_files.sort_by(|a, b| a.path.cmp(&b.path));

  let count = sorted_files.len();
  println!(
    "{} Skipped {} {}:",
    symbols::SKIPPED.if_supports_color(Stream::Stdout, |s| s.yellow()),
    count,
    if count == 1 { "file" } else { "files" }
  );

  for file in &sorted_files {
    match &file.detail {
      Some(reason) => println!(
        "  {} ({})",
        file.path.display().if_supports_color(Stream::Stdout, |s| s.dimmed()),
        reason
      ),
      None => println!(
        "  {}",
        file.path.display().if_supports_color(Stream::Stdout, |s| s.dimmed())
      ),
    }
  }
}

/// Print the list of files that could not be processed.
pub fn print_error_files(files: &[&FileReport]) {
  if is_quiet() || files.is_empty() {
    return;
  }

  let mut sorted_files: Vec<_> = files.to_vec();
  sorted_files.sort_by(|a, b| a.path.cmp(&b.path));

  let count = sorted_files.len();
  println!(
    "{} {} {} could not be processed:",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    count,
    if count == 1 { "file" } else { "files" }
  );

  for file in &sorted_files {
    match &file.detail {
      Some(message) => println!("  {}: {}", file.path.display(), message),
      None => println!("  {}", file.path.display()),
    }
  }
}

/// Print the success message when every checked file matched.
pub fn print_all_files_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All files have the expected license header.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the run summary.
///
/// Dry-run format: "Summary: X OK, Y need fixes, Z skipped"
/// Fix-mode format: "Summary: X OK, Y fixed, Z skipped"
/// Errors are appended when present. In verbose mode, also shows timing.
pub fn print_summary(summary: &RunSummary) {
  if is_quiet() {
    return;
  }

  let ok_str = summary.matched.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string();

  let middle = if summary.fix_mode {
    format!(
      "{} fixed",
      summary.fixed.if_supports_color(Stream::Stdout, |s| s.blue())
    )
  } else if summary.needs_fix > 0 {
    format!(
      "{} need fixes",
      summary.needs_fix.if_supports_color(Stream::Stdout, |s| s.red())
    )
  } else {
    format!(
      "{} need fixes",
      summary.needs_fix.if_supports_color(Stream::Stdout, |s| s.cyan())
    )
  };

  let skipped_str = summary
    .skipped
    .if_supports_color(Stream::Stdout, |s| s.dimmed())
    .to_string();

  let mut summary_line = format!("Summary: {} OK, {}, {} skipped", ok_str, middle, skipped_str);

  if summary.errors > 0 {
    summary_line.push_str(&format!(
      ", {} {}",
      summary.errors.if_supports_color(Stream::Stdout, |s| s.red()),
      if summary.errors == 1 { "error" } else { "errors" }
    ));
  }

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.duration.as_secs_f64()));
  }

  println!("{}", summary_line);
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Categorize file reports into different groups for output.
pub struct CategorizedReports<'a> {
  /// Files whose header already matched
  pub matched: Vec<&'a FileReport>,
  /// Files whose header is missing or stale (dry run)
  pub needs_fix: Vec<&'a FileReport>,
  /// Files rewritten in fix mode
  pub fixed: Vec<&'a FileReport>,
  /// Files skipped
  pub skipped: Vec<&'a FileReport>,
  /// Files that failed
  pub errors: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  /// Categorize a slice of file reports.
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut matched = Vec::new();
    let mut needs_fix = Vec::new();
    let mut fixed = Vec::new();
    let mut skipped = Vec::new();
    let mut errors = Vec::new();

    for report in reports {
      match report.action {
        FileAction::Matched => matched.push(report),
        FileAction::NeedsFix => needs_fix.push(report),
        FileAction::Fixed => fixed.push(report),
        FileAction::Skipped => skipped.push(report),
        FileAction::Error => errors.push(report),
      }
    }

    Self {
      matched,
      needs_fix,
      fixed,
      skipped,
      errors,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;

  fn report(path: &str, action: FileAction) -> FileReport {
    FileReport::new(PathBuf::from(path), action)
  }

  #[test]
  fn test_categorize_reports_needs_fix() {
    let reports = vec![report("src/main.js", FileAction::NeedsFix)];

    let categorized = CategorizedReports::from_reports(&reports);

    assert_eq!(categorized.needs_fix.len(), 1);
    assert!(categorized.matched.is_empty());
    assert!(categorized.fixed.is_empty());
    assert!(categorized.skipped.is_empty());
    assert!(categorized.errors.is_empty());
  }

  #[test]
  fn test_categorize_reports_fixed() {
    let reports = vec![report("src/main.js", FileAction::Fixed)];

    let categorized = CategorizedReports::from_reports(&reports);

    assert!(categorized.needs_fix.is_empty());
    assert_eq!(categorized.fixed.len(), 1);
  }

  #[test]
  fn test_categorize_reports_mixed() {
    let reports = vec![
      report("src/ok.js", FileAction::Matched),
      report("src/stale.js", FileAction::NeedsFix),
      report("src/repaired.js", FileAction::Fixed),
      report("notes.txt", FileAction::Skipped),
      report("bin/blob", FileAction::Error),
    ];

    let categorized = CategorizedReports::from_reports(&reports);

    assert_eq!(categorized.matched.len(), 1);
    assert_eq!(categorized.needs_fix.len(), 1);
    assert_eq!(categorized.fixed.len(), 1);
    assert_eq!(categorized.skipped.len(), 1);
    assert_eq!(categorized.errors.len(), 1);
  }
}
