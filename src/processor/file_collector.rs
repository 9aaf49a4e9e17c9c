//! # File Collector Module
//!
//! This module turns command-line patterns into the concrete list of files a
//! run will check. A pattern may name a file (checked directly), a directory
//! (walked recursively), or a glob (expanded; matched directories recurse).
//!
//! Discovery is where filtering happens: hidden entries are pruned from the
//! walk, symlinks are skipped, excluded paths are dropped, and files without
//! a registered comment grammar fall away silently. Only explicitly named
//! files get a skip report when they cannot be checked.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::header::grammar_for;
use crate::ignore::IgnoreManager;
use crate::report::{FileAction, FileReport};
use crate::verbose_log;

/// Files selected for a run, plus skip reports for what was set aside.
pub struct CollectedFiles {
  /// Absolute paths the scan will check, sorted for deterministic output.
  pub eligible: Vec<PathBuf>,
  /// Reports for explicitly named files that cannot be checked.
  pub skipped: Vec<FileReport>,
}

/// File collector for pattern expansion and directory traversal.
pub struct FileCollector {
  /// Root the scan is anchored to; display paths are relative to it.
  scan_root: PathBuf,
}

impl FileCollector {
  /// Creates a new FileCollector with the specified scan root.
  pub const fn new(scan_root: PathBuf) -> Self {
    Self { scan_root }
  }

  /// Expands patterns into the files a run will check.
  ///
  /// # Parameters
  ///
  /// * `patterns` - File paths, directory paths, or glob patterns
  /// * `ignore` - The exclude/gitignore matcher for this run
  ///
  /// # Errors
  ///
  /// Returns an error when a pattern is not a valid glob.
  pub fn collect(&self, patterns: &[String], ignore: &IgnoreManager) -> Result<CollectedFiles> {
    let mut eligible = Vec::new();
    let mut skipped = Vec::new();

    for pattern in patterns {
      let candidate = PathBuf::from(pattern);
      if candidate.is_file() {
        self.add_explicit_file(&candidate, ignore, &mut eligible, &mut skipped)?;
      } else if candidate.is_dir() {
        self.traverse_directory(&candidate, ignore, &mut eligible)?;
      } else {
        let entries = glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
        let mut matched_any = false;

        for entry in entries {
          match entry {
            Ok(path) => {
              matched_any = true;
              if path.is_file() {
                // Glob matches count as discovery: ineligible ones drop
                // silently just like files found in a directory walk.
                self.add_discovered_file(&path, ignore, &mut eligible)?;
              } else if path.is_dir() {
                self.traverse_directory(&path, ignore, &mut eligible)?;
              }
            }
            Err(e) => {
              eprintln!("Error with glob pattern: {}", e);
            }
          }
        }

        if !matched_any {
          verbose_log!("Pattern matched nothing: {}", pattern);
        }
      }
    }

    // Overlapping patterns (e.g. "src" and "src/main.js") can yield the same
    // file twice; processing it twice would race in fix mode.
    let unique: HashSet<PathBuf> = eligible.into_iter().collect();
    let mut eligible: Vec<PathBuf> = unique.into_iter().collect();
    eligible.sort();

    Ok(CollectedFiles { eligible, skipped })
  }

  /// Queues a file the user named directly.
  ///
  /// Unlike discovered files, these produce a skip report when excluded or
  /// when no grammar covers them, so the user learns why nothing happened.
  fn add_explicit_file(
    &self,
    path: &Path,
    ignore: &IgnoreManager,
    eligible: &mut Vec<PathBuf>,
    skipped: &mut Vec<FileReport>,
  ) -> Result<()> {
    match std::fs::symlink_metadata(path) {
      Ok(metadata) => {
        if metadata.file_type().is_symlink() {
          verbose_log!("Skipping: {} (symlink)", path.display());
          return Ok(());
        }
      }
      Err(_) => return Ok(()),
    }

    let absolute = absolutize_path(path)?;
    let display = normalize_relative_path(&absolute, &self.scan_root);

    if ignore.is_ignored(&absolute) {
      skipped.push(FileReport::with_detail(
        display,
        FileAction::Skipped,
        "matches an exclude pattern",
      ));
      return Ok(());
    }

    if grammar_for(&display.to_string_lossy()).is_none() {
      skipped.push(FileReport::with_detail(
        display,
        FileAction::Skipped,
        "no comment grammar for this file",
      ));
      return Ok(());
    }

    eligible.push(absolute);
    Ok(())
  }

  /// Queues a file found by traversal or glob expansion; drops silently.
  fn add_discovered_file(&self, path: &Path, ignore: &IgnoreManager, eligible: &mut Vec<PathBuf>) -> Result<()> {
    let absolute = absolutize_path(path)?;

    if ignore.is_ignored(&absolute) {
      return Ok(());
    }

    if grammar_for(&absolute.to_string_lossy()).is_none() {
      verbose_log!("Skipping: {} (no comment grammar)", path.display());
      return Ok(());
    }

    eligible.push(absolute);
    Ok(())
  }

  /// Walks a directory recursively and queues every eligible file.
  ///
  /// Hidden entries (`.git`, `.lichen.toml` and friends) are pruned during
  /// the walk; symlinks are not followed. A hidden file can still be checked
  /// by naming it explicitly.
  fn traverse_directory(&self, dir: &Path, ignore: &IgnoreManager, eligible: &mut Vec<PathBuf>) -> Result<()> {
    debug!("Scanning directory: {}", dir.display());
    let start_time = std::time::Instant::now();
    let before = eligible.len();

    let walker = WalkDir::new(dir)
      .into_iter()
      .filter_entry(|entry| !(entry.depth() > 0 && is_hidden(entry.file_name())));

    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          eprintln!("Error reading directory entry: {}", e);
          continue;
        }
      };

      // Symlinks report their own file type when not followed, so they
      // fail this check and are skipped.
      if !entry.file_type().is_file() {
        continue;
      }

      self.add_discovered_file(entry.path(), ignore, eligible)?;
    }

    debug!(
      "Found {} eligible files in {}ms",
      eligible.len() - before,
      start_time.elapsed().as_millis()
    );

    Ok(())
  }
}

/// True for dotfile names like `.git` or `.cache`.
fn is_hidden(name: &OsStr) -> bool {
  name.to_string_lossy().starts_with('.')
}

/// Converts a potentially relative path to an absolute path.
///
/// # Parameters
///
/// * `path` - The path to absolutize
///
/// # Returns
///
/// The absolute path.
pub fn absolutize_path(path: &Path) -> Result<PathBuf> {
  if path.is_absolute() {
    Ok(path.to_path_buf())
  } else {
    let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
    Ok(current_dir.join(path))
  }
}

/// Normalizes a path to be relative to a given directory.
///
/// # Parameters
///
/// * `path` - The path to normalize
/// * `root` - The directory to make the path relative to
///
/// # Returns
///
/// The normalized relative path.
pub fn normalize_relative_path(path: &Path, root: &Path) -> PathBuf {
  if path.is_absolute() {
    if let Ok(stripped) = path.strip_prefix(root) {
      return stripped.to_path_buf();
    }

    if let Some(rel_path) = pathdiff::diff_paths(path, root) {
      return rel_path;
    }
  }

  let mut normalized = PathBuf::new();
  for component in path.components() {
    if matches!(component, std::path::Component::CurDir) {
      continue;
    }
    normalized.push(component.as_os_str());
  }

  if normalized.as_os_str().is_empty() {
    PathBuf::from(".")
  } else {
    normalized
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(&path, content).expect("write file");
    path
  }

  fn no_ignores(root: &Path) -> IgnoreManager {
    IgnoreManager::new(root, &[]).expect("empty patterns")
  }

  #[test]
  fn test_directory_walk_keeps_only_grammar_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "src/app.js", "console.log('hi');\n");
    write(dir.path(), "src/notes.txt", "plain text\n");
    write(dir.path(), "Makefile", "all:\n");

    let collector = FileCollector::new(dir.path().to_path_buf());
    let collected = collector.collect(&[dir.path().to_string_lossy().to_string()], &no_ignores(dir.path()))?;

    let names: Vec<_> = collected
      .eligible
      .iter()
      .map(|p| normalize_relative_path(p, dir.path()))
      .collect();
    assert_eq!(names, vec![PathBuf::from("Makefile"), PathBuf::from("src/app.js")]);
    assert!(collected.skipped.is_empty());
    Ok(())
  }

  #[test]
  fn test_hidden_entries_are_not_walked() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "app.js", "x\n");
    write(dir.path(), ".git/objects/junk.js", "x\n");
    write(dir.path(), ".cache/tool.py", "x\n");
    write(dir.path(), ".lichen.toml", "excludes = []\n");

    let collector = FileCollector::new(dir.path().to_path_buf());
    let collected = collector.collect(&[dir.path().to_string_lossy().to_string()], &no_ignores(dir.path()))?;

    assert_eq!(collected.eligible.len(), 1);
    assert!(collected.eligible[0].ends_with("app.js"));
    Ok(())
  }

  #[test]
  fn test_hidden_files_can_be_named_explicitly() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write(dir.path(), ".lichen.toml", "excludes = []\n");

    let collector = FileCollector::new(dir.path().to_path_buf());
    let collected = collector.collect(&[config.to_string_lossy().to_string()], &no_ignores(dir.path()))?;

    assert_eq!(collected.eligible.len(), 1);
    Ok(())
  }

  #[test]
  fn test_excluded_files_drop_during_walk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "src/app.js", "x\n");
    write(dir.path(), "vendor/lib.js", "x\n");

    let ignore = IgnoreManager::new(dir.path(), &["vendor/".to_string()])?;
    let collector = FileCollector::new(dir.path().to_path_buf());
    let collected = collector.collect(&[dir.path().to_string_lossy().to_string()], &ignore)?;

    assert_eq!(collected.eligible.len(), 1);
    assert!(collected.eligible[0].ends_with("src/app.js"));
    assert!(collected.skipped.is_empty());
    Ok(())
  }

  #[test]
  fn test_explicit_file_without_grammar_gets_a_report() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let notes = write(dir.path(), "notes.txt", "plain text\n");

    let collector = FileCollector::new(dir.path().to_path_buf());
    let collected = collector.collect(&[notes.to_string_lossy().to_string()], &no_ignores(dir.path()))?;

    assert!(collected.eligible.is_empty());
    assert_eq!(collected.skipped.len(), 1);
    assert_eq!(collected.skipped[0].action, FileAction::Skipped);
    assert_eq!(
      collected.skipped[0].detail.as_deref(),
      Some("no comment grammar for this file")
    );
    Ok(())
  }

  #[test]
  fn test_explicit_excluded_file_gets_a_report() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let minified = write(dir.path(), "app.min.js", "x\n");

    let ignore = IgnoreManager::new(dir.path(), &["*.min.js".to_string()])?;
    let collector = FileCollector::new(dir.path().to_path_buf());
    let collected = collector.collect(&[minified.to_string_lossy().to_string()], &ignore)?;

    assert!(collected.eligible.is_empty());
    assert_eq!(collected.skipped.len(), 1);
    assert_eq!(collected.skipped[0].detail.as_deref(), Some("matches an exclude pattern"));
    Ok(())
  }

  #[test]
  fn test_overlapping_patterns_deduplicate() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let app = write(dir.path(), "src/app.js", "x\n");

    let collector = FileCollector::new(dir.path().to_path_buf());
    let patterns = vec![
      dir.path().to_string_lossy().to_string(),
      app.to_string_lossy().to_string(),
    ];
    let collected = collector.collect(&patterns, &no_ignores(dir.path()))?;

    assert_eq!(collected.eligible.len(), 1);
    Ok(())
  }

  #[test]
  fn test_glob_pattern_expansion() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "a.js", "x\n");
    write(dir.path(), "b.js", "x\n");
    write(dir.path(), "c.py", "x\n");

    let collector = FileCollector::new(dir.path().to_path_buf());
    let pattern = format!("{}/*.js", dir.path().to_string_lossy());
    let collected = collector.collect(&[pattern], &no_ignores(dir.path()))?;

    assert_eq!(collected.eligible.len(), 2);
    Ok(())
  }

  #[test]
  fn test_invalid_glob_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let collector = FileCollector::new(dir.path().to_path_buf());

    let result = collector.collect(&["src/[".to_string()], &no_ignores(dir.path()));
    assert!(result.is_err());
  }

  #[test]
  fn test_normalize_relative_path_inside_root() {
    let result = normalize_relative_path(Path::new("/work/project/src/app.js"), Path::new("/work/project"));
    assert_eq!(result, PathBuf::from("src/app.js"));
  }

  #[test]
  fn test_normalize_relative_path_outside_root() {
    let result = normalize_relative_path(Path::new("/work/other/app.js"), Path::new("/work/project"));
    assert_eq!(result, PathBuf::from("../other/app.js"));
  }

  #[test]
  fn test_absolutize_path_already_absolute() {
    let path = PathBuf::from("/absolute/path");
    let result = absolutize_path(&path).unwrap();
    assert_eq!(result, path);
  }
}
