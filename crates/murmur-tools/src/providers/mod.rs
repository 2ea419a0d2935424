//! Production implementations of injected capabilities.

pub mod gemini;

pub use gemini::GeminiTranscriber;
