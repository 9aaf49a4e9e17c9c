#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Canonical header text used across the CLI tests, with the `{years}`
/// placeholder still in place.
pub const HEADER: &str = "Copyright (C) {years} Example Industries\nLicensed under the MIT License.";

/// Canonical standalone license used across the CLI tests.
pub const STANDALONE: &str = "MIT License\n\nCopyright (C) Example Industries\n";

pub fn current_year() -> i32 {
  chrono::Local::now().format("%Y").to_string().parse().expect("year parses")
}

/// The canonical header as a plain `//` comment, the shape used to seed
/// files that should already pass the check.
pub fn slash_header(years: &str) -> String {
  format!("// Copyright (C) {years} Example Industries\n// Licensed under the MIT License.")
}

/// The canonical header as the fixer renders it for C-style grammars.
pub fn block_header(years: &str) -> String {
  format!("/**\n * Copyright (C) {years} Example Industries\n * Licensed under the MIT License.\n */")
}

/// The canonical header as the fixer renders it for `#` comment grammars.
pub fn hash_header(years: &str) -> String {
  format!("#\n# Copyright (C) {years} Example Industries\n# Licensed under the MIT License.\n#")
}

/// Writes `content` to `root/rel`, creating parent directories as needed.
pub fn write_file(root: &Path, rel: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&path, content)?;
  Ok(path)
}

/// Lays down the canonical license files a configured project carries:
/// `licenses/header.txt`, `licenses/standalone.txt`, and a matching
/// `LICENSE` at the root.
pub fn scaffold_licenses(root: &Path) -> Result<()> {
  write_file(root, "licenses/header.txt", HEADER)?;
  write_file(root, "licenses/standalone.txt", STANDALONE)?;
  write_file(root, "LICENSE", STANDALONE)?;
  Ok(())
}
