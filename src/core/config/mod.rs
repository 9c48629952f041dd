//! core::config
//!
//! Settings file discovery and loading.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$TWOFOLD_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/twofold/config.toml`
//! 3. `~/.twofold/config.toml`
//!
//! Missing files are not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use twofold::core::config::Config;
//!
//! let result = Config::load().unwrap();
//! for warning in &result.warnings {
//!     eprintln!("warning: {}", warning.message);
//! }
//! println!("prompt: {:?}", result.config.prompt());
//! ```

pub mod schema;

pub use schema::{ErrorPolicy, OutputFormat, Settings};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "TWOFOLD_CONFIG";

/// Default interactive prompt.
pub const DEFAULT_PROMPT: &str = "> ";

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Loaded settings plus where they came from.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: Settings,
    path: Option<PathBuf>,
}

impl Config {
    /// Load settings from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read,
    /// parsed, or validated.
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        for path in Self::search_paths(&mut warnings) {
            if path.exists() {
                let config = Self::load_from(&path)?;
                return Ok(ConfigLoadResult { config, warnings });
            }
        }

        Ok(ConfigLoadResult {
            config: Config::default(),
            warnings,
        })
    }

    /// Load settings from an explicit file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        settings.validate()?;

        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(Config {
            settings,
            path: Some(path.to_path_buf()),
        })
    }

    fn search_paths(warnings: &mut Vec<ConfigWarning>) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(explicit) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(explicit);
            if !path.exists() {
                warnings.push(ConfigWarning {
                    message: format!("${} points to a missing file, ignoring it", CONFIG_ENV),
                    path: path.clone(),
                });
            }
            paths.push(path);
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_home).join("twofold/config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".twofold/config.toml"));
        }

        paths
    }

    /// Path of the file the settings came from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Interactive prompt.
    pub fn prompt(&self) -> &str {
        self.settings.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    /// Response rendering format.
    pub fn output(&self) -> OutputFormat {
        self.settings.output.unwrap_or_default()
    }

    /// Default error policy.
    pub fn on_error(&self) -> ErrorPolicy {
        self.settings.on_error.unwrap_or_default()
    }

    /// Fallback tracing filter.
    pub fn log_filter(&self) -> &str {
        self.settings
            .log_filter
            .as_deref()
            .unwrap_or(DEFAULT_LOG_FILTER)
    }
}
