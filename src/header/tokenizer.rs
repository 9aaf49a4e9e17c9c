//! # Tokenizer Module
//!
//! Scans raw file text into an ordered sequence of comment blocks according
//! to a file type's comment grammar. Only comments starting at the beginning
//! of a (trimmed) physical line are recognized; this is not a language
//! parser and does not understand strings or nested comments.
//!
//! The scan is an explicit finite state machine: `Idle` until a line opens a
//! block or line comment, then `InBlock`/`InLine` until the comment run
//! closes. While a comment is open, each line is evaluated for closing the
//! existing comment first; it is never considered as an opener for a new
//! one.

use super::classifier;
use super::grammar::{BlockCommentDef, CommentGrammar};

/// One contiguous run of comment lines of a single kind (block or line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
  /// Trimmed content lines with delimiters and ignore prefixes stripped.
  pub lines: Vec<String>,
  /// 1-based first physical line of the run (inclusive).
  pub start_line: usize,
  /// 1-based last physical line of the run (inclusive).
  pub end_line: usize,
  /// Whether the block text matches a license-declaration heuristic.
  /// Set once right after tokenization, never recomputed.
  pub license_like: bool,
}

impl CommentBlock {
  fn starting_at(number: usize) -> Self {
    Self {
      lines: Vec::new(),
      start_line: number,
      end_line: number,
      license_like: false,
    }
  }
}

/// Result of tokenizing one file.
#[derive(Debug, Clone)]
pub struct ParseResult {
  /// Leading interpreter directive (`#!...`), without its line ending.
  pub directive: Option<String>,
  /// Comment blocks in document order, non-overlapping.
  pub blocks: Vec<CommentBlock>,
  /// Original physical lines, directive line excluded.
  pub lines: Vec<String>,
  /// `"\r\n"` when the original text contains any carriage return,
  /// otherwise `"\n"`.
  pub line_ending: &'static str,
  /// Earliest copyright year found among license-like blocks.
  pub year_start: Option<i32>,
}

/// Scanner state. The open variants carry the accumulating block; the block
/// variant also keeps the definition that opened it so the matching `end`
/// delimiter and `ignore` prefix are used until the block closes.
enum ScanState<'g> {
  Idle,
  InBlock {
    def: &'g BlockCommentDef,
    block: CommentBlock,
  },
  InLine {
    block: CommentBlock,
  },
}

/// Tokenizes `text` into comment blocks under `grammar`.
///
/// Captures a leading `#!` directive (excluded from the reported physical
/// lines), detects the line-ending convention, and annotates license-like
/// blocks with the earliest copyright year they mention.
///
/// # Parameters
///
/// * `text` - Complete file contents
/// * `grammar` - Comment syntax for the file's type
pub fn tokenize(text: &str, grammar: &CommentGrammar) -> ParseResult {
  let line_ending = if text.contains('\r') { "\r\n" } else { "\n" };
  let (directive, rest) = split_directive(text);
  let lines: Vec<String> = rest
    .split('\n')
    .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
    .collect();

  let mut blocks = Vec::new();
  let mut state = ScanState::Idle;

  for (index, raw) in lines.iter().enumerate() {
    let number = index + 1;
    let trimmed = raw.trim();

    state = match state {
      ScanState::Idle => open_comment(grammar, trimmed, number, &mut blocks),
      ScanState::InBlock { def, mut block } => {
        if let Some(inner) = trimmed.strip_suffix(def.end) {
          // Closing line: counted in the span, content kept only when the
          // line carries text besides the delimiter.
          let content = sanitize(inner, def.ignore);
          if !content.is_empty() {
            block.lines.push(content.to_string());
          }
          block.end_line = number;
          blocks.push(block);
          ScanState::Idle
        } else {
          block.lines.push(sanitize(trimmed, def.ignore).to_string());
          block.end_line = number;
          ScanState::InBlock { def, block }
        }
      }
      ScanState::InLine { mut block } => match strip_line_prefix(grammar, trimmed) {
        Some(content) => {
          block.lines.push(content);
          block.end_line = number;
          ScanState::InLine { block }
        }
        None => {
          // The run closed on the previous line; this line belongs to code
          // and is not reconsidered as an opener.
          blocks.push(block);
          ScanState::Idle
        }
      },
    };
  }

  // A line run reaching end of input is complete. An unterminated block
  // comment is malformed and dropped without a diagnostic.
  if let ScanState::InLine { block } = state {
    blocks.push(block);
  }

  let mut result = ParseResult {
    directive,
    blocks,
    lines,
    line_ending,
    year_start: None,
  };
  classifier::annotate(&mut result);
  result
}

/// Handles a line while no comment is open. Block openers are tried first,
/// in grammar order, then line-comment prefixes.
fn open_comment<'g>(
  grammar: &'g CommentGrammar,
  trimmed: &str,
  number: usize,
  blocks: &mut Vec<CommentBlock>,
) -> ScanState<'g> {
  for def in grammar.blocks {
    if let Some(after_start) = trimmed.strip_prefix(def.start) {
      let mut block = CommentBlock::starting_at(number);

      // The opening line may close the block itself (`/* one-liner */`).
      if let Some(inner) = after_start.trim().strip_suffix(def.end) {
        let content = sanitize(inner, def.ignore);
        if !content.is_empty() {
          block.lines.push(content.to_string());
        }
        blocks.push(block);
        return ScanState::Idle;
      }

      block.lines.push(sanitize(after_start, def.ignore).to_string());
      return ScanState::InBlock { def, block };
    }
  }

  if let Some(content) = strip_line_prefix(grammar, trimmed) {
    let mut block = CommentBlock::starting_at(number);
    block.lines.push(content);
    return ScanState::InLine { block };
  }

  ScanState::Idle
}

/// Trims a line and strips the block's ignore prefix greedily, so `** text`
/// under ignore `*` reduces to `text`.
fn sanitize<'a>(line: &'a str, ignore: Option<&str>) -> &'a str {
  let mut rest = line.trim();
  if let Some(ignore) = ignore {
    while let Some(stripped) = rest.strip_prefix(ignore) {
      rest = stripped.trim();
    }
  }
  rest
}

/// Strips the first matching line-comment prefix, repeatedly, with trimming
/// between rounds (`## x` under `#` reduces to `x`). Returns `None` when no
/// prefix matches the line.
fn strip_line_prefix(grammar: &CommentGrammar, trimmed: &str) -> Option<String> {
  let prefix = grammar.line_prefixes.iter().copied().find(|prefix| trimmed.starts_with(prefix))?;

  let mut rest = trimmed;
  while let Some(stripped) = rest.strip_prefix(prefix) {
    rest = stripped.trim();
  }
  Some(rest.to_string())
}

fn split_directive(text: &str) -> (Option<String>, &str) {
  if !text.starts_with("#!") {
    return (None, text);
  }
  match text.find('\n') {
    Some(index) => {
      let line = text[..index].trim_end_matches('\r');
      (Some(line.to_string()), &text[index + 1..])
    }
    None => (Some(text.to_string()), ""),
  }
}
