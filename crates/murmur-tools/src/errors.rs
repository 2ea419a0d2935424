//! Tool execution error types.

use thiserror::Error;

/// Errors surfaced from tool execution.
///
/// Every variant renders to a caller-readable message; the dispatcher turns
/// them into error results rather than letting them escape as transport
/// failures.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The request arguments were malformed or inconsistent.
    #[error("invalid arguments: {message}")]
    Validation {
        /// What was wrong with the arguments.
        message: String,
    },

    /// Acquisition or transcoding failed.
    #[error(transparent)]
    Audio(#[from] murmur_audio::AudioError),

    /// The remote transcription service failed.
    #[error(transparent)]
    Remote(#[from] murmur_gemini::GeminiError),

    /// Local file I/O failed (note saving, mostly).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Result serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A failure that should not happen under correct configuration.
    #[error("internal error: {message}")]
    Internal {
        /// Diagnostic description.
        message: String,
    },
}

impl ToolError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = ToolError::validation("provide exactly one of audio_base64, url, or host");
        assert!(err.to_string().starts_with("invalid arguments:"));
    }

    #[test]
    fn audio_error_is_transparent() {
        let err = ToolError::from(murmur_audio::AudioError::ToolUnavailable { tool: "ffmpeg" });
        assert_eq!(err.to_string(), "required tool not available: ffmpeg");
    }
}
