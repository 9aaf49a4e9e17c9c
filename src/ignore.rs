//! # Ignore Module
//!
//! Decides which files the scan must not touch. Two pattern sources
//! compose, checked in order:
//!
//! - Exclude globs from the command line or the configuration file
//! - A gitignore-style ignore file (normally the scan root's `.gitignore`),
//!   applied with real gitignore matching semantics including negations
//!
//! Matching runs against paths relative to the scan root.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::verbose_log;

/// Combined matcher for exclude globs and an ignore file.
#[derive(Debug, Clone)]
pub struct IgnoreManager {
  /// Pre-compiled glob set from exclude patterns for zero-allocation
  /// matching.
  exclude_globs: GlobSet,

  /// Gitignore matcher, present once an ignore file was loaded.
  gitignore: Option<Gitignore>,

  /// Scan root that relative matching is anchored to.
  root: PathBuf,
}

impl IgnoreManager {
  /// Creates a manager for `root` from exclude patterns.
  ///
  /// Each pattern is normalized to forward slashes and expanded so that
  /// directory patterns (`vendor/`), plain names (`vendor`), and wildcard
  /// globs (`**/*.min.js`) all match intuitively anywhere under the root.
  ///
  /// # Errors
  ///
  /// Returns an error when a pattern is not a valid glob.
  pub fn new(root: &Path, exclude_patterns: &[String]) -> Result<Self> {
    let mut builder = GlobSetBuilder::new();

    for pattern in exclude_patterns {
      let pattern = pattern.replace('\\', "/");

      let add_pattern = |b: &mut GlobSetBuilder, p: &str| -> Result<()> {
        b.add(Glob::new(p).with_context(|| format!("Invalid exclude pattern: {}", p))?);
        Ok(())
      };

      if let Some(dir_pattern) = pattern.strip_suffix('/') {
        // Directory pattern: match the directory itself and everything in it,
        // at any depth.
        add_pattern(&mut builder, dir_pattern)?;
        add_pattern(&mut builder, &format!("{}/**", dir_pattern))?;
        add_pattern(&mut builder, &format!("**/{}/**", dir_pattern))?;
        add_pattern(&mut builder, &format!("**/{}", dir_pattern))?;
      } else if !pattern.contains('*') && !pattern.contains('?') {
        // Plain name without wildcards - may name a file or a directory.
        add_pattern(&mut builder, &pattern)?;
        add_pattern(&mut builder, &format!("**/{}", pattern))?;
        add_pattern(&mut builder, &format!("{}/**", pattern))?;
        add_pattern(&mut builder, &format!("**/{}/**", pattern))?;
      } else {
        add_pattern(&mut builder, &pattern)?;
        if !pattern.starts_with("**/") {
          add_pattern(&mut builder, &format!("**/{}", pattern))?;
        }
      }
    }

    let exclude_globs = builder.build().with_context(|| "Failed to build exclude glob set")?;

    Ok(Self {
      exclude_globs,
      gitignore: None,
      root: root.to_path_buf(),
    })
  }

  /// Loads a gitignore-style file whose patterns apply from the scan root.
  ///
  /// Blank lines and `#` comments are skipped; everything else goes through
  /// gitignore matching, so negations (`!kept.js`) work.
  ///
  /// # Errors
  ///
  /// Returns an error when the file cannot be read or a line is not a valid
  /// gitignore pattern.
  pub fn load_ignore_file(&mut self, path: &Path) -> Result<()> {
    verbose_log!("Loading ignore file: {}", path.display());
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read ignore file: {}", path.display()))?;

    let mut builder = GitignoreBuilder::new(&self.root);
    for line in content.lines() {
      if !line.trim().is_empty() && !line.trim().starts_with('#') {
        builder
          .add_line(None, line)
          .with_context(|| format!("Failed to add line from ignore file: {}", path.display()))?;
      }
    }

    self.gitignore = Some(builder.build().with_context(|| "Failed to build gitignore matcher")?);
    Ok(())
  }

  /// True when the path matches any exclude glob or the ignore file.
  ///
  /// Accepts absolute paths (matched relative to the root) and root-relative
  /// paths alike.
  pub fn is_ignored(&self, path: &Path) -> bool {
    let relative = match path.strip_prefix(&self.root) {
      Ok(stripped) => Cow::Borrowed(stripped),
      Err(_) => Cow::Borrowed(path),
    };

    if self.exclude_globs.is_match(relative.as_ref()) {
      verbose_log!("Skipping: {} (matches exclude pattern)", path.display());
      return true;
    }

    if let Some(ref gitignore) = self.gitignore {
      let match_result = gitignore.matched_path_or_any_parents(relative.as_ref(), false);
      if match_result.is_ignore() {
        verbose_log!("Skipping: {} (matches ignore file pattern)", path.display());
        return true;
      }
    }

    false
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  fn manager(patterns: &[&str]) -> IgnoreManager {
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
    IgnoreManager::new(Path::new("/project"), &patterns).expect("valid patterns")
  }

  #[test]
  fn empty_patterns_ignore_nothing() {
    let manager = manager(&[]);
    assert!(!manager.is_ignored(Path::new("src/main.rs")));
  }

  #[test]
  fn wildcard_patterns_match_anywhere() {
    let manager = manager(&["**/*.min.js"]);
    assert!(manager.is_ignored(Path::new("dist/app.min.js")));
    assert!(manager.is_ignored(Path::new("/project/deep/nested/lib.min.js")));
    assert!(!manager.is_ignored(Path::new("src/app.js")));
  }

  #[test]
  fn plain_names_match_files_and_directories() {
    let manager = manager(&["vendor"]);
    assert!(manager.is_ignored(Path::new("vendor")));
    assert!(manager.is_ignored(Path::new("vendor/lib.js")));
    assert!(manager.is_ignored(Path::new("third_party/vendor/lib.js")));
    assert!(!manager.is_ignored(Path::new("src/vendored.js")));
  }

  #[test]
  fn directory_patterns_match_recursively() {
    let manager = manager(&["node_modules/"]);
    assert!(manager.is_ignored(Path::new("node_modules/pkg/index.js")));
    assert!(manager.is_ignored(Path::new("web/node_modules/pkg/index.js")));
  }

  #[test]
  fn invalid_glob_is_rejected() {
    let result = IgnoreManager::new(Path::new("/project"), &["src/[".to_string()]);
    assert!(result.is_err());
  }

  #[test]
  fn ignore_file_patterns_apply_with_negations() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let ignore_path = dir.path().join(".gitignore");
    let mut file = fs::File::create(&ignore_path)?;
    writeln!(file, "# build output")?;
    writeln!(file, "target/")?;
    writeln!(file, "*.log")?;
    writeln!(file, "!keep.log")?;

    let mut manager = IgnoreManager::new(dir.path(), &[])?;
    manager.load_ignore_file(&ignore_path)?;

    assert!(manager.is_ignored(&dir.path().join("target/debug/app.js")));
    assert!(manager.is_ignored(Path::new("trace.log")));
    assert!(!manager.is_ignored(Path::new("keep.log")));
    assert!(!manager.is_ignored(Path::new("src/lib.rs")));
    Ok(())
  }

  #[test]
  fn missing_ignore_file_is_an_error() {
    let mut manager = manager(&[]);
    assert!(manager.load_ignore_file(Path::new("/project/.does-not-exist")).is_err());
  }
}
