//! Remote transcription error types.

use thiserror::Error;

/// Errors from the hosted transcription service.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("api error (HTTP {status}): {body}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The resumable upload handshake did not return an upload URL.
    #[error("upload handshake missing upload url")]
    MissingUploadUrl,

    /// The service reported that it failed to process the uploaded file.
    #[error("remote processing failed for {name}")]
    ProcessingFailed {
        /// The remote file resource name.
        name: String,
    },

    /// The uploaded file never became active within the polling ceiling.
    #[error("file not active after {waited_secs}s")]
    Timeout {
        /// Seconds waited before giving up.
        waited_secs: u64,
    },

    /// The model returned no usable text.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// A response body could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file I/O failure while reading audio for upload.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = GeminiError::Api {
            status: 429,
            body: "quota exceeded".into(),
        };
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("quota exceeded"));
    }

    #[test]
    fn timeout_reports_waited_seconds() {
        let err = GeminiError::Timeout { waited_secs: 600 };
        assert_eq!(err.to_string(), "file not active after 600s");
    }

    #[test]
    fn from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(GeminiError::from(json_err), GeminiError::Json(_)));
    }
}
