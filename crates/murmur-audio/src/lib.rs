//! # murmur-audio
//!
//! The audio acquisition-and-normalization pipeline:
//!
//! - **Format classification**: canonical media type from a file name and/or
//!   declared content type, plus the natively-accepted set
//! - **Acquisition**: inline base64, HTTP URL (streamed), or scp pull — each
//!   resolving to a local temp file behind a common size gate
//! - **Transcoding**: ffmpeg re-encode to mono/16 kHz Opus, with an optional
//!   energy-VAD pass that splices out non-speech first
//! - **Temp lifecycle**: [`PreparedAudio`] guard that unlinks every temp file
//!   on each exit path, including failures

#![deny(unsafe_code)]

pub mod acquire;
pub mod errors;
pub mod format;
pub mod temp;
pub mod transcode;
pub mod vad;

pub use acquire::{AcquiredAudio, Acquirer, AudioSource};
pub use errors::AudioError;
pub use format::{classify, is_native, UNKNOWN_MEDIA_TYPE};
pub use temp::PreparedAudio;
pub use transcode::{PrepareMode, Transcoder, COMPRESSED_MEDIA_TYPE};
pub use vad::VadConfig;
