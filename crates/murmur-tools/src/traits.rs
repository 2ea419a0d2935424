//! Tool trait and injected capabilities.

use std::path::Path;

use async_trait::async_trait;
use murmur_core::tools::{Tool, ToolResult};
use serde_json::Value;

use crate::errors::ToolError;

/// Per-invocation context passed to every tool.
#[derive(Clone, Debug, Default)]
pub struct ToolContext {
    /// Correlation id supplied by the host, echoed into logs.
    pub tool_call_id: Option<String>,
}

/// A remote-callable tool.
#[async_trait]
pub trait MurmurTool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// Definition listed to the host.
    fn definition(&self) -> Tool;

    /// Execute with the given JSON arguments.
    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError>;
}

/// The remote transcription capability, behind a trait so the pipeline can be
/// exercised without network access.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a local audio file, returning the raw model reply.
    async fn transcribe(
        &self,
        path: &Path,
        media_type: &str,
        display_name: &str,
        instruction: &str,
    ) -> Result<String, ToolError>;
}
