//! The transcription tool family.

pub mod args;
pub mod pipeline;
pub mod save;
pub mod tools;

pub use args::CommonArgs;
pub use pipeline::{Pipeline, Transcription};
pub use tools::{register_all, ToolKind, TranscribeTool};
