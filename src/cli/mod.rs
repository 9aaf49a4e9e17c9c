//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing and supports subcommands for
//! extensibility.

mod check;

pub use check::{CheckArgs, run_check};
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Version string with the git metadata baked in by the build script,
/// degrading gracefully for builds outside a repository.
fn long_version() -> String {
  let hash = option_env!("GIT_HASH").filter(|s| !s.is_empty()).unwrap_or("unknown");
  let date = option_env!("GIT_DATE").filter(|s| !s.is_empty()).unwrap_or("unknown");
  format!("{} ({hash} {date})", env!("CARGO_PKG_VERSION"))
}

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  long_version = long_version(),
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Check license headers without modifying files
  lichen src/

  # Add or update license headers in place
  lichen --fix include/ src/

  # Use a custom canonical header and pin legacy start years
  lichen --header-file legal/header.txt --years \"src/imported.c:2009\" --fix .

  # Show a diff of what --fix would change
  lichen --show-diff src/**/*.rs

  # Save the pending changes to a diff file
  lichen --save-diff pending.diff src/

  # Exclude vendored and generated code
  lichen --exclude \"**/vendor/**\" --exclude \"**/*.min.js\" src/

  # Write a JSON report of per-file outcomes
  lichen --report-json report.json .
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  #[command(flatten)]
  pub check_args: CheckArgs,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Check and optionally fix license headers in source files (default)
  Check(CheckArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Get the effective check arguments, whether from a subcommand or top-level
  pub fn get_check_args(self) -> CheckArgs {
    match self.command {
      Some(Command::Check(args)) => args,
      None => self.check_args,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::logging::ColorMode;

  #[test]
  fn patterns_default_to_the_current_directory() {
    let cli = Cli::try_parse_from(["lichen"]).expect("bare invocation parses");
    let args = cli.get_check_args();
    assert_eq!(args.patterns, vec![".".to_string()]);
    assert!(!args.fix);
  }

  #[test]
  fn explicit_subcommand_and_flattened_args_are_equivalent() {
    let top = Cli::try_parse_from(["lichen", "--fix", "src"]).expect("flattened form parses");
    let sub = Cli::try_parse_from(["lichen", "check", "--fix", "src"]).expect("subcommand form parses");

    let top_args = top.get_check_args();
    let sub_args = sub.get_check_args();
    assert!(top_args.fix && sub_args.fix);
    assert_eq!(top_args.patterns, sub_args.patterns);
  }

  #[test]
  fn bare_colors_flag_means_always() {
    let cli = Cli::try_parse_from(["lichen", "--colors"]).expect("bare --colors parses");
    assert_eq!(cli.get_check_args().colors, ColorMode::Always);

    let cli = Cli::try_parse_from(["lichen", "--colors", "never"]).expect("--colors never parses");
    assert_eq!(cli.get_check_args().colors, ColorMode::Never);

    let cli = Cli::try_parse_from(["lichen"]).expect("default parses");
    assert_eq!(cli.get_check_args().colors, ColorMode::Auto);
  }

  #[test]
  fn verbose_flag_counts_repetitions() {
    let cli = Cli::try_parse_from(["lichen", "-vvv"]).expect("repeated -v parses");
    assert_eq!(cli.get_check_args().verbose, 3);
  }

  #[test]
  fn quiet_conflicts_with_verbose() {
    assert!(Cli::try_parse_from(["lichen", "-q", "-v"]).is_err());
  }

  #[test]
  fn no_gitignore_conflicts_with_an_explicit_ignore_file() {
    assert!(Cli::try_parse_from(["lichen", "--no-gitignore", "--gitignore", ".gitignore"]).is_err());
  }
}
