use std::fs;
use std::path::Path;

use anyhow::Result;
use lichen::processor::{Processor, ProcessorConfig};
use lichen::report::FileAction;
use lichen::standalone::{StandaloneChecker, StandaloneOutcome};
use tempfile::tempdir;

const HEADER: &str = "Copyright (C) 2024 Example Industries\nLicensed under the MIT License.";

#[tokio::test]
async fn library_consumers_can_check_and_fix_a_tree() -> Result<()> {
  let temp = tempdir()?;
  let root = temp.path();
  fs::create_dir(root.join("src"))?;
  fs::write(root.join("src/app.js"), "console.log(1);\n")?;
  fs::write(
    root.join("src/ok.rs"),
    "// Copyright (C) 2024 Example Industries\n// Licensed under the MIT License.\n\nfn main() {}\n",
  )?;

  // Dry run first: one finding, nothing written.
  let checker = Processor::new(ProcessorConfig::new(HEADER.to_string(), root.to_path_buf()))?;
  let collected = checker.plan(&[root.to_string_lossy().into_owned()])?;
  checker.run(collected).await?;
  let reports = checker.take_reports().await;
  assert_eq!(reports.len(), 2);
  assert!(
    reports
      .iter()
      .any(|r| r.path == Path::new("src/app.js") && r.action == FileAction::NeedsFix)
  );
  assert!(
    reports
      .iter()
      .any(|r| r.path == Path::new("src/ok.rs") && r.action == FileAction::Matched)
  );
  assert_eq!(fs::read_to_string(root.join("src/app.js"))?, "console.log(1);\n");

  // Fix mode repairs in place.
  let fixer = Processor::new(ProcessorConfig {
    fix_mode: true,
    ..ProcessorConfig::new(HEADER.to_string(), root.to_path_buf())
  })?;
  let collected = fixer.plan(&[root.to_string_lossy().into_owned()])?;
  fixer.run(collected).await?;
  let reports = fixer.take_reports().await;
  assert!(
    reports
      .iter()
      .any(|r| r.path == Path::new("src/app.js") && r.action == FileAction::Fixed)
  );

  let fixed = fs::read_to_string(root.join("src/app.js"))?;
  assert!(fixed.starts_with("/**\n * Copyright (C) 2024 Example Industries\n"));
  assert!(fixed.contains("console.log(1);"));
  Ok(())
}

#[tokio::test]
async fn standalone_checker_round_trip() -> Result<()> {
  let temp = tempdir()?;
  let root = temp.path();
  fs::write(root.join("canonical.txt"), "MIT License\n\nCopyright Example Industries\n")?;

  let checker = StandaloneChecker::new(root.join("canonical.txt"));
  assert_eq!(checker.check(root, false).await?, StandaloneOutcome::Missing);

  let fixed = checker.check(root, true).await?;
  assert_eq!(
    fixed,
    StandaloneOutcome::Fixed {
      path: root.join("LICENSE"),
    }
  );
  assert!(matches!(checker.check(root, false).await?, StandaloneOutcome::Matched { .. }));
  Ok(())
}
