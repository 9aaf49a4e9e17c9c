//! # Processor Module
//!
//! This module contains the core functionality for checking files for the
//! expected license header and repairing them in place when fixes are
//! requested.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and writing operations
//! - [`file_collector`] - Pattern expansion, directory traversal, and filtering
//!
//! The [`Processor`] struct is the main entry point, orchestrating the
//! submodules and the header engine to produce one [`FileReport`] per file.

mod file_collector;
mod file_io;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
pub use file_collector::{CollectedFiles, FileCollector, absolutize_path, normalize_relative_path};
pub use file_io::FileIO;
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::diff::DiffManager;
use crate::header::{self, CheckOutcome};
use crate::ignore::IgnoreManager;
use crate::info_log;
use crate::report::{FileAction, FileReport};
use crate::years::YearMap;

/// Configuration for creating a [`Processor`] instance.
pub struct ProcessorConfig {
  /// Canonical header text, before `{years}` expansion.
  pub canonical_header: String,
  /// Root directory of the scan; report paths are shown relative to it.
  pub scan_root: PathBuf,
  /// When true, files are rewritten; otherwise findings are only reported.
  pub fix_mode: bool,
  /// Per-path year overrides for `{years}` expansion.
  pub year_map: YearMap,
  /// Extra exclusion globs applied on top of any ignore file.
  pub exclude_patterns: Vec<String>,
  /// Optional gitignore-style file with additional exclusions.
  pub ignore_file: Option<PathBuf>,
  /// Diff rendering for dry runs; `None` disables diffs entirely.
  pub diff_manager: Option<DiffManager>,
}

impl ProcessorConfig {
  /// Creates a configuration with the given header and scan root, and
  /// conservative defaults everywhere else (dry run, no excludes, no diffs).
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     fix_mode: true,
  ///     ..ProcessorConfig::new(canonical_header, scan_root)
  /// }
  /// ```
  pub fn new(canonical_header: String, scan_root: PathBuf) -> Self {
    Self {
      canonical_header,
      scan_root,
      fix_mode: false,
      year_map: YearMap::default(),
      exclude_patterns: Vec::new(),
      ignore_file: None,
      diff_manager: None,
    }
  }
}

/// Checks a set of files against the canonical license header, optionally
/// repairing them, and accumulates a [`FileReport`] per file.
pub struct Processor {
  /// Root of the current scan.
  scan_root: PathBuf,

  /// Canonical header text, before `{years}` expansion.
  canonical_header: String,

  /// Whether files are rewritten or findings merely reported.
  fix_mode: bool,

  /// Per-path year overrides for `{years}` expansion.
  year_map: YearMap,

  /// Manager for handling diff creation and rendering.
  diff_manager: DiffManager,

  /// Manager for exclusion patterns and ignore-file rules.
  ignore_manager: IgnoreManager,

  /// Expands patterns into concrete file lists.
  file_collector: FileCollector,

  /// Counter for the total number of files whose contents were examined.
  pub files_processed: Arc<AtomicUsize>,

  /// Reports accumulated across [`Processor::run`] calls.
  pub file_reports: Arc<Mutex<Vec<FileReport>>>,
}

impl Processor {
  /// Creates a new processor, compiling exclusion patterns and loading the
  /// ignore file (when configured) up front so pattern errors surface before
  /// any file is touched.
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    let mut ignore_manager = IgnoreManager::new(&config.scan_root, &config.exclude_patterns)?;
    if let Some(ref ignore_file) = config.ignore_file {
      ignore_manager.load_ignore_file(ignore_file)?;
    }

    let file_collector = FileCollector::new(config.scan_root.clone());

    Ok(Self {
      scan_root: config.scan_root,
      canonical_header: config.canonical_header,
      fix_mode: config.fix_mode,
      year_map: config.year_map,
      diff_manager: config.diff_manager.unwrap_or_else(|| DiffManager::new(false, None)),
      ignore_manager,
      file_collector,
      files_processed: Arc::new(AtomicUsize::new(0)),
      file_reports: Arc::new(Mutex::new(Vec::new())),
    })
  }

  /// Expands the given patterns into the set of files to check, without
  /// reading any file contents. Explicitly named files that cannot be
  /// processed come back as skip reports.
  pub fn plan(&self, patterns: &[String]) -> Result<CollectedFiles> {
    self.file_collector.collect(patterns, &self.ignore_manager)
  }

  /// Checks (and in fix mode repairs) every collected file, recording one
  /// report per file. File-level failures become [`FileAction::Error`]
  /// reports rather than aborting the run.
  pub async fn run(&self, collected: CollectedFiles) -> Result<()> {
    let CollectedFiles { eligible, skipped } = collected;
    if !skipped.is_empty() {
      self.file_reports.lock().await.extend(skipped);
    }
    if eligible.is_empty() {
      debug!("No files to process");
      return Ok(());
    }

    let file_count = eligible.len();
    let concurrency = num_cpus::get();
    debug!("Processing {} files across {} concurrent readers", file_count, concurrency);
    let started = std::time::Instant::now();

    let mut reports = futures::stream::iter(eligible)
      .map(|path| async move { self.process_single_file(path).await })
      .buffer_unordered(concurrency);

    while let Some(report) = reports.next().await {
      self.file_reports.lock().await.push(report);
    }

    debug!("Processed {} files in {}ms", file_count, started.elapsed().as_millis());
    Ok(())
  }

  /// Drains the accumulated reports, leaving the processor reusable.
  pub async fn take_reports(&self) -> Vec<FileReport> {
    std::mem::take(&mut *self.file_reports.lock().await)
  }

  /// Checks one file end to end: read, classify against the canonical
  /// header, and in fix mode write the repaired content back.
  async fn process_single_file(&self, path: PathBuf) -> FileReport {
    self.files_processed.fetch_add(1, Ordering::Relaxed);

    // Named to avoid colliding with `tracing::field::display`, which the
    // tracing macros import into their expansion scope.
    let display_path = normalize_relative_path(&path, &self.scan_root);
    // Grammar and year lookups key on forward-slash relative paths.
    let display_name = display_path.to_string_lossy().replace('\\', "/");

    let content = match FileIO::read_full_content(&path).await {
      Ok(content) => content,
      Err(e) => {
        tracing::warn!("{:#}", e);
        return FileReport::with_detail(display_path, FileAction::Error, format!("{:#}", e));
      }
    };

    let year_override = self.year_map.year_for(&display_path);

    match header::check_file_license(
      &display_name,
      &content,
      &self.canonical_header,
      self.fix_mode,
      year_override,
    ) {
      Ok(CheckOutcome::Matched { .. }) => {
        debug!("License header matches: {}", display_path.display());
        FileReport::new(display_path, FileAction::Matched)
      }
      Ok(CheckOutcome::NeedsFix { declarations, .. }) => {
        if self.diff_manager.is_active() {
          self.preview_fix(&display_path, &display_name, &content, year_override);
        }
        let detail = if declarations.is_empty() {
          "missing license header"
        } else {
          "license header is out of date"
        };
        FileReport::with_detail(display_path, FileAction::NeedsFix, detail)
      }
      Ok(CheckOutcome::Fixed { text }) => match FileIO::write_file(&path, &text).await {
        Ok(()) => {
          info_log!("Fixed license header in: {}", display_path.display());
          FileReport::new(display_path, FileAction::Fixed)
        }
        Err(e) => FileReport::with_detail(display_path, FileAction::Error, format!("{:#}", e)),
      },
      // Grammar coverage is checked at collection time, so this only fires
      // when a file changes shape between planning and processing.
      Err(e) => FileReport::with_detail(display_path, FileAction::Skipped, e.to_string()),
    }
  }

  /// Renders the repaired content for diff display without writing anything.
  fn preview_fix(&self, display: &Path, display_name: &str, content: &str, year_override: Option<i32>) {
    if let Ok(CheckOutcome::Fixed { text }) =
      header::check_file_license(display_name, content, &self.canonical_header, true, year_override)
      && let Err(e) = self.diff_manager.display_diff(display, content, &text)
    {
      eprintln!("Warning: Failed to render diff for {}: {}", display.display(), e);
    }
  }
}
