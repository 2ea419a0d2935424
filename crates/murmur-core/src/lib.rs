//! # murmur-core
//!
//! Foundation types for the murmur transcription tool suite:
//!
//! - **Tool schema**: [`Tool`] and [`ToolParameterSchema`] — the JSON Schema
//!   surface a host sees when listing tools
//! - **Tool results**: [`ToolResult`] with content, details, and error flag
//! - **Configuration**: [`Config`] — the process-wide immutable configuration
//!   built once at startup and injected into the components that need it

#![deny(unsafe_code)]

pub mod config;
pub mod tools;

pub use config::{Config, ConfigError};
pub use tools::{Tool, ToolParameterSchema, ToolResult, error_result, text_result};
