//! # Comment Grammar Module
//!
//! Static table describing how comments are spelled per file type, both for
//! recognition (tokenizing existing comments) and for re-emission (writing a
//! license header back out).
//!
//! Entries are matched in table order: an entry matches when the lowercased
//! path ends with `.<extension>` or the lowercased basename equals one of the
//! entry's filenames. The first matching entry wins.

/// Block comment delimiters for one file type.
///
/// The `write_*` fields override the delimiters used when a header is
/// re-emitted; when absent, re-emission falls back to `start`/`end` and an
/// empty line prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCommentDef {
  /// Delimiter opening the block, e.g. `/*`.
  pub start: &'static str,
  /// Delimiter closing the block, e.g. `*/`.
  pub end: &'static str,
  /// Decorative prefix stripped (repeatedly) from interior lines, e.g. `*`.
  pub ignore: Option<&'static str>,
  /// Opening delimiter used when writing a header, e.g. `/**`.
  pub write_start: Option<&'static str>,
  /// Closing delimiter used when writing a header, e.g. ` */`.
  pub write_end: Option<&'static str>,
  /// Per-line prefix used when writing a header, e.g. ` *`.
  pub write_line_prefix: Option<&'static str>,
}

/// Comment syntax for one file type.
#[derive(Debug, Clone, Copy)]
pub struct CommentGrammar {
  /// Human-readable grammar name, used in diagnostics.
  pub name: &'static str,
  /// Extensions matched as a `.<ext>` suffix of the lowercased path.
  pub extensions: &'static [&'static str],
  /// Exact (lowercased) basenames, for files like `Jenkinsfile`.
  pub filenames: &'static [&'static str],
  /// Line-comment prefixes, tried in order.
  pub line_prefixes: &'static [&'static str],
  /// Block-comment definitions, tried in order.
  pub blocks: &'static [BlockCommentDef],
}

/// Resolved delimiters for re-emitting a header.
///
/// Comes from the first block-comment definition when the grammar has one,
/// otherwise from the first line-comment prefix used uniformly as start,
/// line prefix, and end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteForm {
  pub start: &'static str,
  pub line_prefix: &'static str,
  pub end: &'static str,
}

impl CommentGrammar {
  /// Returns the delimiters to use when writing a header for this grammar.
  pub fn write_form(&self) -> WriteForm {
    if let Some(def) = self.blocks.first() {
      WriteForm {
        start: def.write_start.unwrap_or(def.start),
        line_prefix: def.write_line_prefix.unwrap_or(""),
        end: def.write_end.unwrap_or(def.end),
      }
    } else {
      let prefix = self.line_prefixes.first().copied().unwrap_or_default();
      WriteForm {
        start: prefix,
        line_prefix: prefix,
        end: prefix,
      }
    }
  }
}

/// C-style block comment written back as a doc-comment shaped header.
const C_STYLE_BLOCK: BlockCommentDef = BlockCommentDef {
  start: "/*",
  end: "*/",
  ignore: Some("*"),
  write_start: Some("/**"),
  write_end: Some(" */"),
  write_line_prefix: Some(" *"),
};

const HTML_BLOCK: BlockCommentDef = BlockCommentDef {
  start: "<!--",
  end: "-->",
  ignore: None,
  write_start: None,
  write_end: None,
  write_line_prefix: Some(" "),
};

const SLASHES: &[&str] = &["//"];
const HASH: &[&str] = &["#"];

/// The grammar table. Order matters: lookups take the first match.
static GRAMMARS: &[CommentGrammar] = &[
  CommentGrammar {
    name: "javascript",
    extensions: &["js"],
    filenames: &[],
    line_prefixes: SLASHES,
    blocks: &[C_STYLE_BLOCK],
  },
  CommentGrammar {
    name: "typescript",
    extensions: &["ts"],
    filenames: &[],
    line_prefixes: SLASHES,
    blocks: &[C_STYLE_BLOCK],
  },
  CommentGrammar {
    name: "java",
    extensions: &["java", "groovy"],
    filenames: &["jenkinsfile"],
    line_prefixes: SLASHES,
    blocks: &[C_STYLE_BLOCK],
  },
  CommentGrammar {
    name: "rust",
    extensions: &["rs"],
    filenames: &[],
    line_prefixes: SLASHES,
    blocks: &[C_STYLE_BLOCK],
  },
  CommentGrammar {
    name: "go",
    extensions: &["go"],
    filenames: &[],
    line_prefixes: SLASHES,
    blocks: &[C_STYLE_BLOCK],
  },
  CommentGrammar {
    name: "c",
    extensions: &["c", "h", "cpp", "hpp", "cc"],
    filenames: &[],
    line_prefixes: SLASHES,
    blocks: &[C_STYLE_BLOCK],
  },
  CommentGrammar {
    name: "css",
    extensions: &["css", "less", "sass"],
    filenames: &[],
    line_prefixes: &[],
    blocks: &[C_STYLE_BLOCK],
  },
  CommentGrammar {
    name: "html",
    extensions: &["html", "htm"],
    filenames: &[],
    line_prefixes: &[],
    blocks: &[HTML_BLOCK],
  },
  CommentGrammar {
    name: "shell",
    extensions: &["sh", "bash"],
    filenames: &[],
    line_prefixes: HASH,
    blocks: &[],
  },
  CommentGrammar {
    name: "python",
    extensions: &["py"],
    filenames: &[],
    line_prefixes: HASH,
    blocks: &[],
  },
  CommentGrammar {
    name: "ruby",
    extensions: &["rb"],
    filenames: &[],
    line_prefixes: HASH,
    blocks: &[],
  },
  CommentGrammar {
    name: "yaml",
    extensions: &["yml", "yaml"],
    filenames: &[],
    line_prefixes: HASH,
    blocks: &[],
  },
  CommentGrammar {
    name: "toml",
    extensions: &["toml"],
    filenames: &[],
    line_prefixes: HASH,
    blocks: &[],
  },
  CommentGrammar {
    name: "make",
    extensions: &[],
    filenames: &["makefile"],
    line_prefixes: HASH,
    blocks: &[],
  },
  CommentGrammar {
    name: "docker",
    extensions: &[],
    filenames: &["dockerfile"],
    line_prefixes: HASH,
    blocks: &[],
  },
];

/// True when `lowered` ends with `.<ext>`.
fn has_extension(lowered: &str, ext: &str) -> bool {
  lowered.strip_suffix(ext).is_some_and(|rest| rest.ends_with('.'))
}

/// Resolves the comment grammar for a path.
///
/// Matching is case-insensitive: extensions are compared as a suffix of the
/// whole path, filenames against the basename. Returns `None` when no table
/// entry matches.
///
/// # Parameters
///
/// * `path` - The file path or name to look up
pub fn grammar_for(path: &str) -> Option<&'static CommentGrammar> {
  let lowered = path.to_lowercase();
  let basename = lowered.rsplit(['/', '\\']).next().unwrap_or(lowered.as_str());

  GRAMMARS
    .iter()
    .find(|grammar| {
      grammar.extensions.iter().any(|ext| has_extension(&lowered, ext))
        || grammar.filenames.iter().any(|name| basename == *name)
    })
}

/// All extensions known to the grammar table, for discovery.
pub fn known_extensions() -> impl Iterator<Item = &'static str> {
  GRAMMARS.iter().flat_map(|grammar| grammar.extensions.iter().copied())
}

/// All exact filenames known to the grammar table, for discovery.
pub fn known_filenames() -> impl Iterator<Item = &'static str> {
  GRAMMARS.iter().flat_map(|grammar| grammar.filenames.iter().copied())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_by_extension() {
    let grammar = grammar_for("src/app.js").expect("javascript grammar");
    assert_eq!(grammar.name, "javascript");

    let grammar = grammar_for("lib/Main.Java").expect("java grammar");
    assert_eq!(grammar.name, "java");

    let grammar = grammar_for("scripts/deploy.sh").expect("shell grammar");
    assert_eq!(grammar.name, "shell");
  }

  #[test]
  fn resolves_by_exact_filename() {
    let grammar = grammar_for("ci/Jenkinsfile").expect("jenkinsfile grammar");
    assert_eq!(grammar.name, "java");

    let grammar = grammar_for("Makefile").expect("makefile grammar");
    assert_eq!(grammar.name, "make");

    let grammar = grammar_for("docker/Dockerfile").expect("dockerfile grammar");
    assert_eq!(grammar.name, "docker");
  }

  #[test]
  fn extension_requires_leading_dot() {
    // "mats" must not match the "ts" entry
    assert!(grammar_for("formats").is_none());
    assert!(grammar_for("data.mats").is_none());
    assert!(grammar_for("x.ts").is_some());
  }

  #[test]
  fn unknown_path_has_no_grammar() {
    assert!(grammar_for("README.md").is_none());
    assert!(grammar_for("binary.png").is_none());
    assert!(grammar_for("noextension").is_none());
  }

  #[test]
  fn write_form_prefers_block_definition() {
    let form = grammar_for("a.js").expect("javascript grammar").write_form();
    assert_eq!(
      form,
      WriteForm {
        start: "/**",
        line_prefix: " *",
        end: " */",
      }
    );
  }

  #[test]
  fn write_form_falls_back_to_block_delimiters() {
    let form = grammar_for("page.html").expect("html grammar").write_form();
    assert_eq!(
      form,
      WriteForm {
        start: "<!--",
        line_prefix: " ",
        end: "-->",
      }
    );
  }

  #[test]
  fn write_form_uses_line_prefix_when_no_block_form() {
    let form = grammar_for("setup.py").expect("python grammar").write_form();
    assert_eq!(
      form,
      WriteForm {
        start: "#",
        line_prefix: "#",
        end: "#",
      }
    );
  }

  #[test]
  fn every_entry_can_recognize_and_write() {
    for grammar in GRAMMARS {
      assert!(
        !grammar.line_prefixes.is_empty() || !grammar.blocks.is_empty(),
        "grammar {} has no comment form",
        grammar.name
      );
      assert!(!grammar.write_form().start.is_empty(), "grammar {} has no write form", grammar.name);
      assert!(
        !grammar.extensions.is_empty() || !grammar.filenames.is_empty(),
        "grammar {} can never match a file",
        grammar.name
      );
    }
  }
}
