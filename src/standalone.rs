//! # Standalone License Module
//!
//! Verifies that the scan root carries the canonical license as a standalone
//! `LICENSE` (or `LICENSE.txt`) file. This is a pure byte comparison by
//! SHA-256 digest, no parsing; fixing writes the canonical bytes to
//! `<root>/LICENSE`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

/// Candidate filenames, checked in order.
pub const STANDALONE_CANDIDATES: [&str; 2] = ["LICENSE", "LICENSE.txt"];

/// Outcome of the standalone license check for one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandaloneOutcome {
  /// A candidate file exists and its digest matches the canonical bytes.
  Matched { path: PathBuf },
  /// No candidate file exists.
  Missing,
  /// A candidate file exists but differs from the canonical bytes.
  Mismatched { path: PathBuf },
  /// A fix was requested; the canonical bytes now live at `path`.
  Fixed { path: PathBuf },
  /// The canonical standalone file itself is absent; check not performed.
  Skipped,
}

/// Checker bound to one canonical standalone license file.
#[derive(Debug, Clone)]
pub struct StandaloneChecker {
  canonical_path: PathBuf,
}

impl StandaloneChecker {
  pub fn new(canonical_path: PathBuf) -> Self {
    Self { canonical_path }
  }

  /// Checks (and with `fix`, repairs) the standalone license under `root`.
  ///
  /// # Errors
  ///
  /// I/O failures reading candidates or writing the fix; a canonical path
  /// that exists but is not a regular file.
  pub async fn check(&self, root: &Path, fix: bool) -> Result<StandaloneOutcome> {
    let canonical = match fs::metadata(&self.canonical_path).await {
      Ok(meta) if meta.is_file() => fs::read(&self.canonical_path)
        .await
        .with_context(|| format!("failed to read standalone license {}", self.canonical_path.display()))?,
      Ok(_) => bail!("standalone license {} is not a regular file", self.canonical_path.display()),
      Err(_) => return Ok(StandaloneOutcome::Skipped),
    };

    let existing = self.find_candidate(root).await;

    match existing {
      Some(path) => {
        let bytes = fs::read(&path)
          .await
          .with_context(|| format!("failed to read {}", path.display()))?;
        let existing_digest = hex_digest(&bytes);
        let canonical_digest = hex_digest(&canonical);
        debug!(
          existing = %existing_digest,
          expected = %canonical_digest,
          "standalone license digests"
        );

        if existing_digest == canonical_digest {
          return Ok(StandaloneOutcome::Matched { path });
        }
        if fix {
          return self.write_canonical(root, &canonical).await;
        }
        Ok(StandaloneOutcome::Mismatched { path })
      }
      None => {
        if fix {
          return self.write_canonical(root, &canonical).await;
        }
        Ok(StandaloneOutcome::Missing)
      }
    }
  }

  async fn find_candidate(&self, root: &Path) -> Option<PathBuf> {
    for name in STANDALONE_CANDIDATES {
      let candidate = root.join(name);
      if let Ok(meta) = fs::metadata(&candidate).await
        && meta.is_file()
      {
        return Some(candidate);
      }
    }
    None
  }

  /// The fix always lands at `LICENSE`; a stale `LICENSE.txt` stays behind
  /// but the first-candidate lookup finds the repaired file from then on.
  async fn write_canonical(&self, root: &Path, canonical: &[u8]) -> Result<StandaloneOutcome> {
    let target = root.join(STANDALONE_CANDIDATES[0]);
    fs::write(&target, canonical)
      .await
      .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(StandaloneOutcome::Fixed { path: target })
  }
}

fn hex_digest(bytes: &[u8]) -> String {
  let digest = Sha256::digest(bytes);
  digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
  use std::fs as std_fs;

  use super::*;

  fn checker_with_canonical(dir: &Path, text: &str) -> StandaloneChecker {
    let canonical = dir.join("canonical.txt");
    std_fs::write(&canonical, text).expect("write canonical");
    StandaloneChecker::new(canonical)
  }

  #[tokio::test]
  async fn matches_an_identical_license_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let checker = checker_with_canonical(dir.path(), "MIT License\n");
    std_fs::write(dir.path().join("LICENSE"), "MIT License\n")?;

    let outcome = checker.check(dir.path(), false).await?;
    assert_eq!(
      outcome,
      StandaloneOutcome::Matched {
        path: dir.path().join("LICENSE"),
      }
    );
    Ok(())
  }

  #[tokio::test]
  async fn accepts_license_txt_as_fallback_candidate() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let checker = checker_with_canonical(dir.path(), "MIT License\n");
    std_fs::write(dir.path().join("LICENSE.txt"), "MIT License\n")?;

    let outcome = checker.check(dir.path(), false).await?;
    assert_eq!(
      outcome,
      StandaloneOutcome::Matched {
        path: dir.path().join("LICENSE.txt"),
      }
    );
    Ok(())
  }

  #[tokio::test]
  async fn reports_missing_when_no_candidate_exists() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let checker = checker_with_canonical(dir.path(), "MIT License\n");

    assert_eq!(checker.check(dir.path(), false).await?, StandaloneOutcome::Missing);
    Ok(())
  }

  #[tokio::test]
  async fn reports_mismatch_on_different_bytes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let checker = checker_with_canonical(dir.path(), "MIT License\n");
    std_fs::write(dir.path().join("LICENSE"), "Apache License\n")?;

    let outcome = checker.check(dir.path(), false).await?;
    assert_eq!(
      outcome,
      StandaloneOutcome::Mismatched {
        path: dir.path().join("LICENSE"),
      }
    );
    Ok(())
  }

  #[tokio::test]
  async fn fix_writes_the_canonical_bytes_to_license() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let checker = checker_with_canonical(dir.path(), "MIT License\n");

    let outcome = checker.check(dir.path(), true).await?;
    assert_eq!(
      outcome,
      StandaloneOutcome::Fixed {
        path: dir.path().join("LICENSE"),
      }
    );
    assert_eq!(std_fs::read_to_string(dir.path().join("LICENSE"))?, "MIT License\n");

    // A second pass sees the repaired file.
    assert!(matches!(checker.check(dir.path(), true).await?, StandaloneOutcome::Matched { .. }));
    Ok(())
  }

  #[tokio::test]
  async fn fix_targets_license_even_when_license_txt_mismatched() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let checker = checker_with_canonical(dir.path(), "MIT License\n");
    std_fs::write(dir.path().join("LICENSE.txt"), "stale\n")?;

    let outcome = checker.check(dir.path(), true).await?;
    assert_eq!(
      outcome,
      StandaloneOutcome::Fixed {
        path: dir.path().join("LICENSE"),
      }
    );
    // The stale fallback file is left in place; LICENSE now wins lookup.
    assert_eq!(std_fs::read_to_string(dir.path().join("LICENSE.txt"))?, "stale\n");
    assert!(matches!(checker.check(dir.path(), false).await?, StandaloneOutcome::Matched { .. }));
    Ok(())
  }

  #[tokio::test]
  async fn skips_when_canonical_file_is_absent() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let checker = StandaloneChecker::new(dir.path().join("nope.txt"));

    assert_eq!(checker.check(dir.path(), false).await?, StandaloneOutcome::Skipped);
    Ok(())
  }
}
