//! # Header Reconciler Module
//!
//! Reassembles a file around its canonical license header: directive first,
//! then the header rendered through the grammar's write form, a separating
//! blank line, and the remaining original lines with any prior license
//! blocks excised. Pure text-to-text; writing the result back is the
//! caller's job.

use super::classifier;
use super::grammar::CommentGrammar;
use super::tokenizer::{CommentBlock, ParseResult};

/// Renders expanded canonical text as comment lines.
///
/// With a block form: `write_start`, one prefixed line per canonical line
/// (`write_line_prefix` + space + trimmed text; the bare prefix for empty
/// lines), then `write_end`. With only line-comment syntax the first prefix
/// serves as start, per-line prefix, and end alike, sandwiching the text.
///
/// Leading and trailing blank lines of the canonical text are dropped;
/// interior blank lines are kept.
pub fn render_header(expanded: &str, grammar: &CommentGrammar) -> Vec<String> {
  let form = grammar.write_form();
  let body = expanded.trim();

  let mut rendered = Vec::new();
  if !form.start.is_empty() {
    rendered.push(form.start.to_string());
  }
  for line in body.split('\n') {
    let trimmed = line.trim();
    if form.line_prefix.is_empty() {
      rendered.push(trimmed.to_string());
    } else if trimmed.is_empty() {
      rendered.push(form.line_prefix.to_string());
    } else {
      rendered.push(format!("{} {}", form.line_prefix, trimmed));
    }
  }
  if !form.end.is_empty() {
    rendered.push(form.end.to_string());
  }

  rendered
}

/// Produces the repaired file text.
///
/// Order matters: expand `{years}`, render the header, then assemble
/// directive + blank (when present), header, one blank separator (when the
/// first surviving body line is non-blank), and every original line whose
/// number falls outside all removal ranges. The result joins with the line
/// ending detected at tokenization.
///
/// # Parameters
///
/// * `result` - Tokenization of the original file
/// * `removals` - Blocks to excise, normally the license-like ones
/// * `canonical` - Canonical license text, may contain `{years}`
/// * `grammar` - Grammar supplying the write form
/// * `current_year` - Year used for placeholder expansion
pub fn fix_license(
  result: &ParseResult,
  removals: &[&CommentBlock],
  canonical: &str,
  grammar: &CommentGrammar,
  current_year: i32,
) -> String {
  let expanded = classifier::expand_years(canonical, result.year_start, current_year);

  let mut output: Vec<String> = Vec::new();
  if let Some(directive) = &result.directive {
    output.push(directive.clone());
    output.push(String::new());
  }
  output.extend(render_header(&expanded, grammar));

  let surviving: Vec<&String> = if removals.is_empty() {
    result.lines.iter().collect()
  } else {
    result
      .lines
      .iter()
      .enumerate()
      .filter(|(index, _)| {
        let number = index + 1;
        !removals
          .iter()
          .any(|block| number >= block.start_line && number <= block.end_line)
      })
      .map(|(_, line)| line)
      .collect()
  };

  if surviving.first().is_some_and(|line| !line.trim().is_empty()) {
    output.push(String::new());
  }
  output.extend(surviving.into_iter().cloned());

  output.join(result.line_ending)
}

#[cfg(test)]
mod tests {
  use super::super::classifier::find_expected_license;
  use super::super::grammar::grammar_for;
  use super::super::tokenizer::tokenize;
  use super::*;

  const CANONICAL: &str = "Copyright {years} Example\nAll rights reserved.";

  fn javascript() -> &'static CommentGrammar {
    grammar_for("a.js").expect("javascript grammar")
  }

  fn shell() -> &'static CommentGrammar {
    grammar_for("a.sh").expect("shell grammar")
  }

  #[test]
  fn renders_block_write_form() {
    let rendered = render_header("Copyright 2024 Example\nAll rights reserved.", javascript());
    assert_eq!(rendered, vec!["/**", " * Copyright 2024 Example", " * All rights reserved.", " */"]);
  }

  #[test]
  fn renders_line_comment_form_as_sandwich() {
    let rendered = render_header("Copyright 2024 Example", shell());
    assert_eq!(rendered, vec!["#", "# Copyright 2024 Example", "#"]);
  }

  #[test]
  fn renders_html_write_form() {
    let rendered = render_header("Copyright 2024 Example", grammar_for("p.html").expect("html grammar"));
    assert_eq!(rendered, vec!["<!--", "  Copyright 2024 Example", "-->"]);
  }

  #[test]
  fn render_keeps_interior_blank_lines_and_drops_outer_ones() {
    let rendered = render_header("\nfirst\n\nsecond\n\n", javascript());
    assert_eq!(rendered, vec!["/**", " * first", " *", " * second", " */"]);
  }

  #[test]
  fn fixes_a_bare_file_with_the_expected_prefix() {
    let result = tokenize("console.log('hi');", javascript());
    let fixed = fix_license(&result, &[], CANONICAL, javascript(), 2024);

    assert!(fixed.starts_with("/**\n * Copyright 2024 Example\n * All rights reserved.\n */\n\nconsole.log('hi');"));
  }

  #[test]
  fn adds_header_and_separator_line_counts() {
    let original = "fn main() {}\nmore();\n";
    let result = tokenize(original, grammar_for("a.rs").expect("rust grammar"));
    let fixed = fix_license(&result, &[], CANONICAL, grammar_for("a.rs").expect("rust grammar"), 2024);

    let original_count = original.split('\n').count();
    let fixed_count = fixed.split('\n').count();
    // 4 rendered header lines plus 1 separator, first original line is
    // non-blank.
    assert_eq!(fixed_count, original_count + 4 + 1);
  }

  #[test]
  fn skips_separator_when_body_starts_blank() {
    let result = tokenize("\ncode();\n", javascript());
    let fixed = fix_license(&result, &[], "Copyright {years} Example", javascript(), 2024);

    assert!(fixed.starts_with("/**\n * Copyright 2024 Example\n */\n\ncode();"));
    let original_count = 3;
    assert_eq!(fixed.split('\n').count(), original_count + 3);
  }

  #[test]
  fn excises_exactly_the_removal_ranges() {
    let text = "/* Copyright (C) 2019 Old Corp */\nkeep_one();\n// All rights reserved\nkeep_two();\n";
    let result = tokenize(text, javascript());
    let removals: Vec<&CommentBlock> = result.blocks.iter().filter(|block| block.license_like).collect();
    assert_eq!(removals.len(), 2);

    let fixed = fix_license(&result, &removals, CANONICAL, javascript(), 2024);

    assert!(fixed.contains("keep_one();"));
    assert!(fixed.contains("keep_two();"));
    assert!(!fixed.contains("Old Corp"));
    assert!(!fixed.contains("// All rights reserved"));
    // Detected start year 2019 flows into the replacement header.
    assert!(fixed.contains("Copyright 2019, 2024 Example"));
  }

  #[test]
  fn preserves_directive_ahead_of_header() {
    let result = tokenize("#!/bin/sh\nset -e\n", shell());
    let fixed = fix_license(&result, &[], "Copyright {years} Example", shell(), 2024);

    assert!(fixed.starts_with("#!/bin/sh\n\n#\n# Copyright 2024 Example\n#\n\nset -e"));
  }

  #[test]
  fn preserves_crlf_line_endings() {
    let result = tokenize("code();\r\n", javascript());
    let fixed = fix_license(&result, &[], "Copyright {years} Example", javascript(), 2024);

    assert!(fixed.starts_with("/**\r\n * Copyright 2024 Example\r\n */\r\n\r\ncode();"));
    assert!(!fixed.contains("\n\n\n"));
  }

  #[test]
  fn reconciled_output_passes_the_exact_match_check() {
    let text = "// (C) Copyright 2001 Stale Corp\n\nlet x = 1;\n";
    let result = tokenize(text, javascript());
    let removals: Vec<&CommentBlock> = result.blocks.iter().filter(|block| block.license_like).collect();
    let fixed = fix_license(&result, &removals, CANONICAL, javascript(), 2024);

    let reparsed = tokenize(&fixed, javascript());
    assert!(find_expected_license(&reparsed, CANONICAL, 2024).is_some());

    // Fixing the fixed text changes nothing.
    let again = fix_license(
      &reparsed,
      &reparsed.blocks.iter().filter(|block| block.license_like).collect::<Vec<_>>(),
      CANONICAL,
      javascript(),
      2024,
    );
    assert_eq!(again, fixed);
  }
}
