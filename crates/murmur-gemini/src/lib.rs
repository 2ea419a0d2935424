//! # murmur-gemini
//!
//! Client for the hosted transcription capability:
//!
//! - **Files API**: resumable upload, state polling, generation, deletion
//! - **Session**: the upload→poll→generate→delete round-trip with a
//!   guaranteed delete on every exit path
//! - **Response parsing**: lenient recovery of `{title, description,
//!   transcript}` from replies that may be fenced or plain prose

#![deny(unsafe_code)]

pub mod errors;
pub mod files;
pub mod response;
pub mod session;

pub use errors::GeminiError;
pub use files::{FileState, FilesClient, RemoteFileHandle};
pub use response::{parse, ParsedTranscript, FALLBACK_DESCRIPTION, FALLBACK_TITLE};
pub use session::{SessionConfig, TranscriptionSession};
