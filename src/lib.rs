//! # lichen
//!
//! A tool that keeps license headers in source files aligned with one canonical text.
//!
//! `lichen` scans directory patterns recursively, compares each file's leading comments against
//! the expected header, and either reports drift or repairs the files in place. Stale license
//! declarations are replaced rather than stacked, copyright year ranges are carried forward, and
//! shebang lines and encoding cookies stay where their interpreters need them.
//!
//! ## Features
//!
//! * Recursively scan directories, globs, or explicit files for license headers
//! * Per-file-type comment grammars decide how headers are read and written
//! * Dry-run mode reports drift without touching files; `--fix` repairs in place
//! * Exclude globs and gitignore-style ignore files filter the scan
//! * `{years}` placeholder expansion with per-file start-year overrides
//! * Standalone `LICENSE` file verification by content digest
//!
//! ## Usage as a Library
//!
//! This crate can be used as a library in your Rust projects:
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use lichen::processor::{Processor, ProcessorConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ProcessorConfig {
//!         fix_mode: false,
//!         ..ProcessorConfig::new(
//!             "Copyright {years} Example Industries".to_string(),
//!             PathBuf::from("."),
//!         )
//!     };
//!     let processor = Processor::new(config)?;
//!
//!     let collected = processor.plan(&["src".to_string()])?;
//!     processor.run(collected).await?;
//!
//!     for report in processor.take_reports().await {
//!         println!("{}: {:?}", report.path.display(), report.action);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`header`] - The per-file engine: grammar, tokenizer, classifier, reconciler
//! * [`processor`] - Batch orchestration over files and directories
//! * [`standalone`] - Standalone license file verification
//! * [`logging`] - Output modes, logging macros, and color handling
//!
//! [`header`]: crate::header
//! [`processor`]: crate::processor
//! [`standalone`]: crate::standalone
//! [`logging`]: crate::logging

pub mod cli;
pub mod config;
pub mod diff;
pub mod header;
pub mod ignore;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod standalone;
pub mod years;

// Note: the logging macros are exported from the crate root by
// `#[macro_export]`; re-exporting them here would cause redefinition errors
