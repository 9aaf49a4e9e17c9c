//! # Check Command
//!
//! This module implements the license-header check/fix command. This is the
//! default command when no subcommand is specified.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, warn};

use crate::config::load_config;
use crate::diff::DiffManager;
use crate::info_log;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  CategorizedReports, print_all_files_ok, print_blank_line, print_error_files, print_fixed_files, print_hint,
  print_needs_fix_files, print_skipped_files, print_start_message, print_summary,
};
use crate::processor::{Processor, ProcessorConfig, normalize_relative_path};
use crate::report::{FileAction, FileReport, RunSummary, write_json_report};
use crate::standalone::{StandaloneChecker, StandaloneOutcome};
use crate::years::YearMap;

/// Built-in default for `--header-file`, relative to the scan root.
const DEFAULT_HEADER_FILE: &str = "licenses/header.txt";

/// Built-in default for `--standalone-file`, relative to the scan root.
const DEFAULT_STANDALONE_FILE: &str = "licenses/standalone.txt";

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
  /// File or directory patterns to check. Directories are checked
  /// recursively, glob patterns are expanded.
  #[arg(required = false, default_value = ".")]
  pub patterns: Vec<String>,

  /// Canonical header text; may contain a {years} placeholder
  #[arg(
    long,
    short = 'H',
    value_name = "FILE",
    help = "Canonical header text; may contain a {years} placeholder

[default: licenses/header.txt]"
  )]
  pub header_file: Option<PathBuf>,

  /// Canonical standalone license body
  #[arg(
    long,
    short = 'L',
    value_name = "FILE",
    help = "Canonical standalone license body

[default: licenses/standalone.txt]"
  )]
  pub standalone_file: Option<PathBuf>,

  /// Skip the standalone license check
  #[arg(long)]
  pub no_standalone: bool,

  /// Fix mode: rewrite files and the standalone license
  #[arg(
    long,
    short = 'f',
    help = "Fix mode: rewrite files and the standalone license

[default: dry run, report only]"
  )]
  pub fix: bool,

  /// File patterns to exclude (supports glob patterns, repeatable)
  #[arg(long, short = 'e', value_name = "GLOB")]
  pub exclude: Vec<String>,

  /// Honor a gitignore-style file (default: .gitignore in the scan root)
  #[arg(long, value_name = "FILE")]
  pub gitignore: Option<PathBuf>,

  /// Do not honor any ignore file
  #[arg(long, conflicts_with = "gitignore")]
  pub no_gitignore: bool,

  /// Per-file copyright start years: a file of path:year lines, or an
  /// inline comma-separated list of path:year entries
  #[arg(long, value_name = "SPEC")]
  pub years: Option<String>,

  /// Path to config file (default: .lichen.toml in the scan root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Show a unified diff of pending changes in dry-run mode
  #[arg(long)]
  pub show_diff: bool,

  /// Save the diff of pending changes to a file in dry-run mode
  #[arg(long, value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Write a JSON report of per-file outcomes to the given path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Run the check command with the given arguments
pub async fn run_check(args: CheckArgs) -> Result<()> {
  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  // Set verbose mode for output formatting and info_log! macro
  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let scan_root = resolve_scan_root(&args.patterns)?;
  debug!("Scan root: {}", scan_root.display());

  // Load configuration file if present. CLI flags take precedence over
  // config values; config values take precedence over built-in defaults.
  let config = load_config(args.config.as_deref(), &scan_root, args.no_config)?.unwrap_or_default();

  let header_path = match args.header_file {
    Some(path) => path,
    None => resolve_against_root(
      &scan_root,
      config.header_file.unwrap_or_else(|| PathBuf::from(DEFAULT_HEADER_FILE)),
    ),
  };
  let standalone_path = match args.standalone_file {
    Some(path) => path,
    None => resolve_against_root(
      &scan_root,
      config
        .standalone_file
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STANDALONE_FILE)),
    ),
  };
  let standalone_enabled = !args.no_standalone && config.standalone.unwrap_or(true);

  // Trailing whitespace in the header file would otherwise render as an
  // empty trailing comment line in every fixed file.
  let canonical_header = std::fs::read_to_string(&header_path)
    .with_context(|| format!("Failed to read header file {}", header_path.display()))?
    .trim_end()
    .to_string();

  let mut year_map = YearMap::default();
  for (path, &year) in &config.years {
    year_map.pin(path, year);
  }
  if let Some(ref spec) = args.years {
    // CLI entries override config entries for the same path.
    year_map.extend(YearMap::from_spec(spec)?);
  }

  let mut exclude_patterns = config.excludes;
  exclude_patterns.extend(args.exclude.iter().cloned());

  let ignore_file = if args.no_gitignore {
    None
  } else if let Some(path) = args.gitignore {
    Some(path)
  } else if !config.use_gitignore.unwrap_or(true) {
    None
  } else {
    let default_ignore = scan_root.join(".gitignore");
    default_ignore.is_file().then_some(default_ignore)
  };

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff);
  diff_manager.init()?;

  let processor = Processor::new(ProcessorConfig {
    fix_mode: args.fix,
    year_map,
    exclude_patterns,
    ignore_file,
    diff_manager: Some(diff_manager),
    ..ProcessorConfig::new(canonical_header, scan_root.clone())
  })?;

  // Collect up front so the start message can carry the file count.
  let collected = processor.plan(&args.patterns)?;
  print_start_message(collected.eligible.len(), args.fix);

  let start_time = Instant::now();
  processor.run(collected).await?;

  let mut file_reports = processor.take_reports().await;

  if standalone_enabled {
    let checker = StandaloneChecker::new(standalone_path.clone());
    let report = match checker.check(&scan_root, args.fix).await {
      Ok(outcome) => standalone_report(outcome, &scan_root, &standalone_path),
      Err(e) => FileReport::with_detail(PathBuf::from("LICENSE"), FileAction::Error, format!("{e:#}")),
    };
    file_reports.push(report);
  }

  let elapsed = start_time.elapsed();

  // Concurrent processing finishes in arbitrary order; sort for stable
  // output and reports.
  file_reports.sort_by(|a, b| a.path.cmp(&b.path));

  let summary = RunSummary::from_reports(&file_reports, args.fix, elapsed);
  let categorized = CategorizedReports::from_reports(&file_reports);

  print_blank_line();

  if !categorized.errors.is_empty() {
    print_error_files(&categorized.errors);
    print_blank_line();
  }

  if args.fix {
    if !categorized.fixed.is_empty() {
      print_fixed_files(&categorized.fixed);
    } else if summary.is_clean() {
      print_all_files_ok();
    }
  } else if !categorized.needs_fix.is_empty() {
    print_needs_fix_files(&categorized.needs_fix);
  } else if summary.is_clean() {
    print_all_files_ok();
  }

  print_skipped_files(&categorized.skipped);

  print_blank_line();
  print_summary(&summary);

  if !args.fix && summary.needs_fix > 0 {
    print_blank_line();
    print_hint("Run with --fix to add or update license headers.");
  }

  if let Some(ref output_path) = args.report_json {
    if let Err(e) = write_json_report(output_path, &file_reports, &summary) {
      eprintln!("Error writing JSON report: {}", e);
    } else {
      info_log!("Wrote JSON report to {}", output_path.display());
    }
  }

  // Exit with a non-zero code when files need fixes or failed to process
  if !summary.is_clean() {
    process::exit(1);
  }

  Ok(())
}

/// Resolves the directory a run is anchored to: the first pattern naming an
/// existing directory, else the parent of the first pattern naming an
/// existing file, else the current directory.
fn resolve_scan_root(patterns: &[String]) -> Result<PathBuf> {
  let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;

  for pattern in patterns {
    let candidate = PathBuf::from(pattern);
    if candidate.is_dir() {
      return Ok(abs_path_or_current(&candidate, &current_dir));
    }

    if candidate.is_file()
      && let Some(parent) = candidate.parent()
    {
      return Ok(abs_path_or_current(parent, &current_dir));
    }
  }

  Ok(current_dir)
}

fn abs_path_or_current(path: &Path, current_dir: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    current_dir.join(path)
  }
}

/// Resolves a config-sourced path against the scan root. Paths given on the
/// command line stay relative to the working directory instead.
fn resolve_against_root(root: &Path, path: PathBuf) -> PathBuf {
  if path.is_absolute() { path } else { root.join(path) }
}

/// Folds the standalone license outcome into the per-file report stream so
/// it shares the summary and the exit status.
fn standalone_report(outcome: StandaloneOutcome, scan_root: &Path, canonical_path: &Path) -> FileReport {
  match outcome {
    StandaloneOutcome::Matched { path } => {
      FileReport::new(normalize_relative_path(&path, scan_root), FileAction::Matched)
    }
    StandaloneOutcome::Missing => FileReport::with_detail(
      PathBuf::from("LICENSE"),
      FileAction::NeedsFix,
      "standalone license file is missing",
    ),
    StandaloneOutcome::Mismatched { path } => FileReport::with_detail(
      normalize_relative_path(&path, scan_root),
      FileAction::NeedsFix,
      "standalone license does not match the canonical text",
    ),
    StandaloneOutcome::Fixed { path } => FileReport::new(normalize_relative_path(&path, scan_root), FileAction::Fixed),
    StandaloneOutcome::Skipped => {
      warn!(
        "Standalone license check skipped: {} not found",
        canonical_path.display()
      );
      FileReport::with_detail(
        PathBuf::from("LICENSE"),
        FileAction::Skipped,
        "canonical standalone license not found",
      )
    }
  }
}
