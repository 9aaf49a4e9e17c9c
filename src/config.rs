//! # Configuration Module
//!
//! Project-level configuration for lichen, letting a repository pin its
//! license file locations, exclude patterns, and per-file year overrides
//! so contributors do not have to repeat them on every invocation.
//!
//! Configuration can be specified in a `.lichen.toml` file or via the
//! `LICHEN_CONFIG` environment variable. Command-line flags always win
//! over values from the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".lichen.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "LICHEN_CONFIG";

/// Main configuration struct for lichen.
///
/// Every field is optional; an absent field means "use the built-in
/// default or whatever the command line says".
#[derive(Debug, Default, Deserialize)]
pub struct Config {
  /// Path to the canonical header text, relative to the config file's
  /// directory unless absolute.
  #[serde(default, rename = "header-file")]
  pub header_file: Option<PathBuf>,

  /// Path to the canonical standalone license text.
  #[serde(default, rename = "standalone-file")]
  pub standalone_file: Option<PathBuf>,

  /// Whether the standalone license check runs at all.
  #[serde(default)]
  pub standalone: Option<bool>,

  /// Whether the scan root's `.gitignore` is honored.
  #[serde(default, rename = "use-gitignore")]
  pub use_gitignore: Option<bool>,

  /// Exclude glob patterns, merged with `--exclude` flags.
  #[serde(default)]
  pub excludes: Vec<String>,

  /// Per-file copyright year overrides. Keys are paths as they appear in
  /// scan output, values are four-digit years.
  #[serde(default)]
  pub years: HashMap<String, i32>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A year override is outside the plausible range.
  #[error("Implausible year {year} for '{entry}' in [years]")]
  ImplausibleYear { entry: String, year: i32 },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the configuration file
  ///
  /// # Returns
  ///
  /// The loaded configuration, or an error if the file cannot be read or
  /// parsed.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    verbose_log!("Loaded config with {} year overrides", config.years.len());

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that every `[years]` value is a plausible four-digit year.
  fn validate(&self) -> Result<(), ConfigError> {
    for (entry, &year) in &self.years {
      if !(1000..=2999).contains(&year) {
        return Err(ConfigError::ImplausibleYear {
          entry: entry.clone(),
          year,
        });
      }
    }

    Ok(())
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `LICHEN_CONFIG` environment variable
/// 3. `.lichen.toml` in the scan root
///
/// # Parameters
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `scan_root` - The directory the scan starts from
///
/// # Returns
///
/// The path to the configuration file, or `None` if no config file is found.
pub fn discover_config_path(explicit_path: Option<&Path>, scan_root: &Path) -> Option<PathBuf> {
  // 1. Explicit path from CLI takes highest priority
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  // 2. Check environment variable
  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  // 3. Check scan root
  let root_config = scan_root.join(DEFAULT_CONFIG_FILENAME);
  if root_config.exists() {
    verbose_log!("Using config from scan root: {}", root_config.display());
    return Some(root_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path, or return `None`.
///
/// # Parameters
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `scan_root` - The directory the scan starts from
/// * `no_config` - If true, skip config file discovery entirely
///
/// # Returns
///
/// The loaded configuration, or `None` when discovery is disabled or no
/// config file exists.
pub fn load_config(explicit_path: Option<&Path>, scan_root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, scan_root) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
