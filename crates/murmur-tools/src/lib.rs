//! # murmur-tools
//!
//! The remote-callable transcription tool family and its dispatcher:
//!
//! - [`traits::MurmurTool`] / [`registry::ToolRegistry`]: the tool surface a
//!   host agent lists and invokes
//! - [`transcribe`]: seven tools sharing one
//!   acquire→normalize→transcribe→save pipeline
//! - [`providers`]: the production Gemini-backed transcriber
//!
//! Execution failures come back as error results with readable messages, not
//! transport errors; only malformed JSON or a missing tool is the host's
//! problem.

#![deny(unsafe_code)]

pub mod errors;
pub mod prompts;
pub mod providers;
pub mod registry;
pub mod traits;
pub mod transcribe;

pub use errors::ToolError;
pub use providers::GeminiTranscriber;
pub use registry::ToolRegistry;
pub use traits::{MurmurTool, ToolContext, Transcriber};
pub use transcribe::{register_all, Pipeline, ToolKind, TranscribeTool, Transcription};
