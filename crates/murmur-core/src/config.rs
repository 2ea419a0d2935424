//! Process-wide configuration.
//!
//! Built once at startup and passed into the components that need it, rather
//! than read ad hoc from the environment at arbitrary points. Everything here
//! is read-only after construction; concurrent invocations share it freely.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Default Gemini model used for transcription.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Absolute ceiling on acquired file size (100 MiB).
pub const MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// Size above which even natively accepted formats are re-encoded (15 MiB).
pub const DOWNSAMPLE_THRESHOLD_BYTES: u64 = 15 * 1024 * 1024;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API key environment variable is missing or empty.
    #[error("missing API key: set {var}")]
    MissingApiKey {
        /// The environment variable that was expected.
        var: &'static str,
    },
}

/// Immutable process-wide configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Gemini API key.
    pub api_key: String,
    /// Model identifier used for generation.
    pub model: String,
    /// API base URL (overridable so tests can point at a local server).
    pub base_url: String,
    /// Default directory for saved transcripts, if any.
    pub notes_dir: Option<PathBuf>,
    /// Maximum size of an acquired file in bytes.
    pub max_file_bytes: u64,
    /// Threshold above which native formats are still re-encoded.
    pub downsample_threshold_bytes: u64,
    /// Interval between remote processing-state polls.
    pub poll_interval: Duration,
    /// Maximum total time to wait for remote processing.
    pub poll_ceiling: Duration,
}

impl Config {
    /// Create a configuration with compiled defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            notes_dir: None,
            max_file_bytes: MAX_FILE_BYTES,
            downsample_threshold_bytes: DOWNSAMPLE_THRESHOLD_BYTES,
            poll_interval: Duration::from_secs(1),
            poll_ceiling: Duration::from_secs(600),
        }
    }

    /// Build the configuration from environment variables.
    ///
    /// Reads `GEMINI_API_KEY` (required), `MURMUR_MODEL`, and
    /// `MURMUR_NOTES_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey {
                var: "GEMINI_API_KEY",
            })?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("MURMUR_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        if let Ok(dir) = std::env::var("MURMUR_NOTES_DIR") {
            if !dir.is_empty() {
                config.notes_dir = Some(PathBuf::from(dir));
            }
        }

        debug!(model = %config.model, notes_dir = ?config.notes_dir, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = Config::new("key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_file_bytes, 100 * 1024 * 1024);
        assert_eq!(config.downsample_threshold_bytes, 15 * 1024 * 1024);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.poll_ceiling, Duration::from_secs(600));
        assert!(config.notes_dir.is_none());
    }

    #[test]
    fn missing_api_key_error_names_variable() {
        let err = ConfigError::MissingApiKey {
            var: "GEMINI_API_KEY",
        };
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
