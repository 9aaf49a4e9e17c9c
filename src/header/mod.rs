//! # Header Engine Module
//!
//! The license-header engine: a per-file-type comment grammar, a tokenizer
//! that scans file text into comment blocks, a classifier that compares
//! those blocks against the canonical license text, and a reconciler that
//! rewrites the file with the canonical header in place.
//!
//! [`check_file_license`] ties the pieces together for one file. Everything
//! in here is synchronous and owns no I/O; callers read the file, hand the
//! text in, and persist whatever comes back.

pub mod classifier;
pub mod grammar;
pub mod reconciler;
pub mod tokenizer;

use chrono::Datelike;
pub use grammar::{BlockCommentDef, CommentGrammar, WriteForm, grammar_for};
use thiserror::Error;
pub use tokenizer::{CommentBlock, ParseResult, tokenize};

/// Errors from per-file header checking.
#[derive(Debug, Error)]
pub enum HeaderError {
  /// The grammar table has no entry for the file, so its comments cannot be
  /// recognized. Fatal for the file, never for the run.
  #[error("no comment grammar registered for \"{0}\"")]
  NoGrammar(String),
}

/// 1-based inclusive physical line range of a comment block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
  pub start_line: usize,
  pub end_line: usize,
}

impl From<&CommentBlock> for BlockSpan {
  fn from(block: &CommentBlock) -> Self {
    Self {
      start_line: block.start_line,
      end_line: block.end_line,
    }
  }
}

/// Outcome of checking one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
  /// The canonical license is already present; `span` locates it.
  Matched { span: BlockSpan },
  /// The canonical license is missing or stale. `declarations` are the
  /// license-like blocks currently in the file (possibly none) and
  /// `year_start` the earliest copyright year they mention.
  NeedsFix {
    declarations: Vec<BlockSpan>,
    year_start: Option<i32>,
  },
  /// A rewrite was requested and produced; the caller persists `text`.
  Fixed { text: String },
}

/// The current calendar year, used for `{years}` expansion.
pub fn current_year() -> i32 {
  chrono::Local::now().year()
}

/// Checks one file's license header, optionally producing repaired text.
///
/// Resolves the grammar from `file_name` (first matching table entry wins),
/// tokenizes, and runs the exact-match check. A mismatch reports the
/// license-like blocks found instead, or — when `fix_requested` — removes
/// them and returns the reconciled text. `year_override` takes precedence
/// over any year the classifier extracted.
///
/// # Errors
///
/// [`HeaderError::NoGrammar`] when no grammar matches the file name. The
/// caller should skip the file and keep going.
pub fn check_file_license(
  file_name: &str,
  text: &str,
  canonical: &str,
  fix_requested: bool,
  year_override: Option<i32>,
) -> Result<CheckOutcome, HeaderError> {
  let grammar = grammar_for(file_name).ok_or_else(|| HeaderError::NoGrammar(file_name.to_string()))?;
  let now = current_year();

  let mut result = tokenize(text, grammar);
  if year_override.is_some() {
    result.year_start = year_override;
  }

  if let Some(block) = classifier::find_expected_license(&result, canonical, now) {
    return Ok(CheckOutcome::Matched { span: block.into() });
  }

  let declarations = classifier::license_declarations(&result);
  if !fix_requested {
    return Ok(CheckOutcome::NeedsFix {
      declarations: declarations.iter().map(|block| BlockSpan::from(*block)).collect(),
      year_start: result.year_start,
    });
  }

  let fixed = reconciler::fix_license(&result, &declarations, canonical, grammar, now);
  Ok(CheckOutcome::Fixed { text: fixed })
}
