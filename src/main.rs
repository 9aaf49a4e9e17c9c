//! # lichen
//!
//! A tool that keeps license headers in source files aligned with one
//! canonical text.

use anyhow::Result;
use lichen::cli::{Cli, run_check};

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_check(cli.get_check_args()).await
}
