//! Audio pipeline error types.

use std::io;

use thiserror::Error;

/// Errors from acquisition and transcoding.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Inline payload could not be decoded into audio bytes.
    #[error("invalid audio payload: {message}")]
    InvalidPayload {
        /// Description of the decoding failure.
        message: String,
    },

    /// HTTP download returned a non-success status.
    #[error("fetch failed with HTTP {status} for {url}")]
    FetchFailed {
        /// The HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// HTTP transport failure before a status was received.
    #[error("fetch error: {0}")]
    Http(#[from] reqwest::Error),

    /// scp exited with a non-zero code.
    #[error("remote transfer failed: {stderr}")]
    TransferFailed {
        /// Captured stderr from the transfer tool.
        stderr: String,
    },

    /// Acquired file exceeds the absolute size ceiling.
    #[error("file too large: {size_mib} MiB (max {max_mib} MiB)")]
    FileTooLarge {
        /// Observed size in whole MiB.
        size_mib: u64,
        /// The configured ceiling in whole MiB.
        max_mib: u64,
    },

    /// A required external tool could not be started.
    #[error("required tool not available: {tool}")]
    ToolUnavailable {
        /// The missing executable name.
        tool: &'static str,
    },

    /// ffmpeg exited with a non-zero code.
    #[error("transcode failed: {stderr}")]
    TranscodeFailed {
        /// Captured stderr from ffmpeg.
        stderr: String,
    },

    /// WAV decode/encode failure during segmentation.
    #[error("wav error: {message}")]
    Wav {
        /// Description of the WAV failure.
        message: String,
    },

    /// Generic I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
