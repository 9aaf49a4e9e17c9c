//! # License Classifier Module
//!
//! Decides what the tokenized comments of a file contain: the block that
//! matches the canonical license text exactly (modulo whitespace and the
//! year placeholder), and the blocks that merely look like *some* license
//! declaration. The heuristic pass also extracts the earliest copyright
//! year, which feeds the `{years}` placeholder expansion.
//!
//! All comparisons run on normalized text: every line trimmed, lines joined
//! with single spaces, and the result trimmed. Internal spacing is not
//! collapsed, so the canonical text and a header only match when their
//! wording and spacing agree line for line.

use std::sync::LazyLock;

use regex::Regex;

use super::tokenizer::{CommentBlock, ParseResult};

/// Phrases that mark a comment block as a license declaration. A block is
/// license-like when its normalized text matches any one of them.
static LICENSE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
  [
    r"(?i)SPDX-License-Identifier:",
    r"(?i)Copyright\s+\(C\)",
    r"(?i)\(C\)\s+Copyright",
    r"(?i)©\s+Copyright",
    r"(?i)All\s+rights\s+reserved",
    r"(?i)THE\s+SOFTWARE\s+IS\s+PROVIDED",
    r"(?i)Permission\s+to\s+use",
  ]
  .iter()
  .map(|pattern| Regex::new(pattern).expect("license pattern must compile"))
  .collect()
});

/// Matches a 4-digit year following the word "Copyright", with or without a
/// `(C)`/`©` symbol in between. Years outside 1000-2999 are not plausible
/// copyright years and are left alone.
static COPYRIGHT_YEAR: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)copyright\s+(?:(?:\(c\)|©)\s+)?([12][0-9]{3})").expect("year regex must compile"));

/// Annotates freshly tokenized blocks: marks license-like blocks and records
/// the earliest copyright year any of them mentions. Runs exactly once per
/// parse, immediately after tokenization.
pub(crate) fn annotate(result: &mut ParseResult) {
  let mut year_start: Option<i32> = None;

  for block in &mut result.blocks {
    block.license_like = is_license_like(&normalize_lines(block.lines.iter().map(String::as_str)));
    if !block.license_like {
      continue;
    }
    for line in &block.lines {
      if let Some(year) = earliest_year_in_line(line) {
        year_start = Some(year_start.map_or(year, |current| current.min(year)));
      }
    }
  }

  result.year_start = year_start;
}

/// True when normalized comment text matches any license-declaration phrase.
pub fn is_license_like(normalized: &str) -> bool {
  LICENSE_PATTERNS.iter().any(|pattern| pattern.is_match(normalized))
}

/// Expands the `{years}` placeholder in the canonical text.
///
/// The start year is `year_start` when known, otherwise the current year.
/// A start year equal to the current year expands to that year alone,
/// anything older to `"<start>, <current>"`.
pub fn expand_years(canonical: &str, year_start: Option<i32>, current_year: i32) -> String {
  let start = year_start.unwrap_or(current_year);
  let years = if start == current_year {
    start.to_string()
  } else {
    format!("{start}, {current_year}")
  };
  canonical.replace("{years}", &years)
}

/// Returns the first block whose normalized text equals the normalized,
/// year-expanded canonical text.
///
/// # Parameters
///
/// * `result` - Tokenization of the file under check
/// * `canonical` - Expected license text, may contain `{years}`
/// * `current_year` - Year used for placeholder expansion
pub fn find_expected_license<'a>(
  result: &'a ParseResult,
  canonical: &str,
  current_year: i32,
) -> Option<&'a CommentBlock> {
  let expanded = expand_years(canonical, result.year_start, current_year);
  let target = normalize_text(&expanded);

  result
    .blocks
    .iter()
    .find(|block| normalize_lines(block.lines.iter().map(String::as_str)) == target)
}

/// All blocks annotated as license-like, in document order. An empty result
/// means the file declares no license at all.
pub fn license_declarations(result: &ParseResult) -> Vec<&CommentBlock> {
  result.blocks.iter().filter(|block| block.license_like).collect()
}

/// Normalizes multi-line text: each line trimmed, joined with single spaces,
/// ends trimmed.
fn normalize_text(text: &str) -> String {
  normalize_lines(text.split('\n'))
}

fn normalize_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
  lines.map(str::trim).collect::<Vec<_>>().join(" ").trim().to_string()
}

fn earliest_year_in_line(line: &str) -> Option<i32> {
  COPYRIGHT_YEAR
    .captures_iter(line)
    .filter_map(|caps| caps.get(1).and_then(|year| year.as_str().parse::<i32>().ok()))
    .min()
}
