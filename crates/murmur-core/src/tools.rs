//! Tool definition and result types.
//!
//! Defines the schema for tools that a host agent can invoke, plus the
//! result type returned by tool execution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Tool schema
// ─────────────────────────────────────────────────────────────────────────────

/// JSON Schema-compatible parameter definition for a tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolParameterSchema {
    /// Top-level JSON Schema type.
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property definitions (when type is `object`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Map<String, Value>>,
    /// Required property names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Description of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Catch-all for additional JSON Schema properties.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A tool definition that can be listed to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (unique identifier).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's parameters.
    pub parameters: ToolParameterSchema,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a tool execution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// The tool output content.
    pub content: String,
    /// Optional structured details (tool-specific metadata).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Whether the execution resulted in an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Create a simple text result.
#[must_use]
pub fn text_result(text: impl Into<String>, is_error: bool) -> ToolResult {
    ToolResult {
        content: text.into(),
        details: None,
        is_error: if is_error { Some(true) } else { None },
    }
}

/// Create an error result.
#[must_use]
pub fn error_result(message: impl Into<String>) -> ToolResult {
    text_result(message, true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_serde_roundtrip() {
        let tool = Tool {
            name: "transcribe_audio".into(),
            description: "Transcribe an audio recording".into(),
            parameters: ToolParameterSchema {
                schema_type: "object".into(),
                properties: Some({
                    let mut m = serde_json::Map::new();
                    let _ = m.insert(
                        "url".into(),
                        json!({"type": "string", "description": "URL of the recording"}),
                    );
                    m
                }),
                required: None,
                description: None,
                extra: serde_json::Map::new(),
            },
        };
        let json = serde_json::to_value(&tool).unwrap();
        let back: Tool = serde_json::from_value(json).unwrap();
        assert_eq!(tool, back);
    }

    #[test]
    fn parameter_schema_serializes_type_key() {
        let schema = ToolParameterSchema {
            schema_type: "object".into(),
            properties: None,
            required: None,
            description: None,
            extra: serde_json::Map::new(),
        };
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "object");
    }

    #[test]
    fn text_result_success() {
        let r = text_result("output", false);
        assert_eq!(r.content, "output");
        assert!(r.is_error.is_none());
    }

    #[test]
    fn error_result_has_is_error() {
        let r = error_result("something went wrong");
        assert_eq!(r.is_error, Some(true));
    }

    #[test]
    fn result_serde_skips_absent_fields() {
        let r = text_result("ok", false);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("isError").is_none());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn result_serde_with_details() {
        let r = ToolResult {
            content: "ok".into(),
            details: Some(json!({"savedTo": "/tmp/note.md"})),
            is_error: None,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["details"]["savedTo"], "/tmp/note.md");
    }
}
