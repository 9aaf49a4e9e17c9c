//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.
//! Operations are async (`tokio::fs`) so many files can be in flight at once.

use std::path::Path;

use anyhow::{Context, Result};

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Reads a whole file as UTF-8 text.
  ///
  /// The header scan needs the complete file: comment blocks can sit below
  /// a directive line and the reconciler rewrites everything after them.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to read
  ///
  /// # Errors
  ///
  /// Returns an error when the file cannot be read or is not valid UTF-8.
  pub async fn read_full_content(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
      .await
      .with_context(|| format!("Failed to read file: {}", path.display()))?;

    String::from_utf8(bytes).map_err(|_| anyhow::anyhow!("File is not valid UTF-8: {}", path.display()))
  }

  /// Write file content.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to write
  /// * `content` - Content to write to the file
  pub async fn write_file(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
      .await
      .with_context(|| format!("Failed to write file: {}", path.display()))
  }
}
