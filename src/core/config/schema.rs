//! core::config::schema
//!
//! Settings schema.
//!
//! # Example
//!
//! ```toml
//! prompt = "app> "
//! output = "compact"
//! on_error = "report"
//! log_filter = "twofold=debug"
//! ```

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// How responses are rendered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented JSON, two-space step
    #[default]
    Pretty,
    /// Single-line JSON
    Compact,
}

/// What the default error handler does after reporting an error.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Report and terminate the process with a failure status
    #[default]
    Exit,
    /// Report and return control to the caller
    Report,
}

/// Framework settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Interactive shell prompt
    pub prompt: Option<String>,

    /// Response rendering
    pub output: Option<OutputFormat>,

    /// Default error policy
    pub on_error: Option<ErrorPolicy>,

    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl Settings {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prompt) = &self.prompt {
            if prompt.contains('\n') {
                return Err(ConfigError::InvalidValue(
                    "prompt must be a single line".into(),
                ));
            }
        }

        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "log_filter must not be empty".into(),
                ));
            }
        }

        Ok(())
    }
}
