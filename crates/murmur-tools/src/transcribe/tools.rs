//! The transcription tool family.
//!
//! Seven tools share one pipeline; a [`ToolKind`] picks the instruction and
//! normalization mode, and declares any per-kind required arguments.

use std::sync::Arc;

use async_trait::async_trait;
use murmur_audio::PrepareMode;
use murmur_core::tools::{error_result, Tool, ToolParameterSchema, ToolResult};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::errors::ToolError;
use crate::prompts;
use crate::registry::ToolRegistry;
use crate::traits::{MurmurTool, ToolContext};
use crate::transcribe::args::{parse_common, CommonArgs};
use crate::transcribe::pipeline::Pipeline;

/// Which transcription tool this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    /// Cleaned-up transcript, minimal processing.
    Standard,
    /// Every word as spoken.
    Verbatim,
    /// Caller supplies the instruction.
    Custom,
    /// Transcript rendered in a named format.
    Formatted,
    /// Force re-encoding before submission.
    Compressed,
    /// Spoken project description → written specification.
    ProjectSpec,
    /// Strip non-speech audio before submission.
    VoiceOnly,
}

/// All kinds, in registration order.
pub const ALL_KINDS: &[ToolKind] = &[
    ToolKind::Standard,
    ToolKind::Verbatim,
    ToolKind::Custom,
    ToolKind::Formatted,
    ToolKind::Compressed,
    ToolKind::ProjectSpec,
    ToolKind::VoiceOnly,
];

impl ToolKind {
    /// The tool's registered name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "transcribe_audio",
            Self::Verbatim => "transcribe_verbatim",
            Self::Custom => "transcribe_custom",
            Self::Formatted => "transcribe_formatted",
            Self::Compressed => "transcribe_compressed",
            Self::ProjectSpec => "transcribe_project_spec",
            Self::VoiceOnly => "transcribe_voice_only",
        }
    }

    /// How the audio is normalized before submission.
    #[must_use]
    pub fn prepare_mode(self) -> PrepareMode {
        match self {
            Self::Standard | Self::Verbatim | Self::Custom | Self::Formatted | Self::ProjectSpec => {
                PrepareMode::Standard
            }
            Self::Compressed => PrepareMode::Compress,
            Self::VoiceOnly => PrepareMode::VoiceActivity,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Standard => {
                "Transcribe an audio recording into a cleaned-up transcript with a title and summary."
            }
            Self::Verbatim => {
                "Transcribe an audio recording word for word, keeping fillers and false starts."
            }
            Self::Custom => {
                "Transcribe an audio recording following a caller-supplied instruction."
            }
            Self::Formatted => {
                "Transcribe an audio recording and render the transcript in a requested format."
            }
            Self::Compressed => {
                "Transcribe an audio recording, always re-encoding it to a compact voice codec first."
            }
            Self::ProjectSpec => {
                "Turn a spoken project description into a written Markdown project specification."
            }
            Self::VoiceOnly => {
                "Transcribe an audio recording after stripping non-speech audio via voice activity detection."
            }
        }
    }

    /// Instruction for this kind, given the validated arguments.
    fn instruction(self, args: &CommonArgs) -> Result<String, ToolError> {
        match self {
            Self::Standard | Self::Compressed => Ok(prompts::default_instruction()),
            Self::Verbatim => Ok(prompts::verbatim_instruction()),
            Self::Custom => {
                let instruction = args
                    .raw
                    .instruction
                    .as_deref()
                    .map(str::trim)
                    .filter(|i| !i.is_empty())
                    .ok_or_else(|| ToolError::validation("instruction is required"))?;
                Ok(prompts::custom_instruction(instruction))
            }
            Self::Formatted => {
                let format = args
                    .raw
                    .format
                    .as_deref()
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .ok_or_else(|| ToolError::validation("format is required"))?;
                Ok(prompts::formatted_instruction(format))
            }
            Self::ProjectSpec => Ok(prompts::project_spec_instruction()),
            Self::VoiceOnly => Ok(if args.raw.verbatim.unwrap_or(false) {
                prompts::verbatim_instruction()
            } else {
                prompts::default_instruction()
            }),
        }
    }

    fn definition(self) -> Tool {
        let mut properties = common_properties();
        let mut required: Vec<String> = Vec::new();
        match self {
            Self::Custom => {
                let _ = properties.insert(
                    "instruction".into(),
                    json!({
                        "type": "string",
                        "description": "Instruction describing how to transcribe or process the audio"
                    }),
                );
                required.push("instruction".into());
            }
            Self::Formatted => {
                let _ = properties.insert(
                    "format".into(),
                    json!({
                        "type": "string",
                        "description": "Output format for the transcript, e.g. 'bullet points' or 'meeting minutes'"
                    }),
                );
                required.push("format".into());
            }
            Self::VoiceOnly => {
                let _ = properties.insert(
                    "verbatim".into(),
                    json!({
                        "type": "boolean",
                        "description": "Keep every word as spoken instead of cleaning up the transcript"
                    }),
                );
            }
            _ => {}
        }

        Tool {
            name: self.name().into(),
            description: self.description().into(),
            parameters: ToolParameterSchema {
                schema_type: "object".into(),
                properties: Some(properties),
                required: if required.is_empty() {
                    None
                } else {
                    Some(required)
                },
                description: None,
                extra: Map::new(),
            },
        }
    }
}

/// Argument properties shared by every tool in the family.
fn common_properties() -> Map<String, Value> {
    let mut m = Map::new();
    let _ = m.insert(
        "audio_base64".into(),
        json!({"type": "string", "description": "Base64-encoded audio payload"}),
    );
    let _ = m.insert(
        "url".into(),
        json!({"type": "string", "description": "HTTP(S) URL of the recording"}),
    );
    let _ = m.insert(
        "host".into(),
        json!({"type": "string", "description": "Remote host to pull the recording from over scp"}),
    );
    let _ = m.insert(
        "remote_path".into(),
        json!({"type": "string", "description": "Path of the recording on the remote host"}),
    );
    let _ = m.insert(
        "user".into(),
        json!({"type": "string", "description": "Remote user for scp"}),
    );
    let _ = m.insert(
        "port".into(),
        json!({"type": "integer", "description": "Remote ssh port"}),
    );
    let _ = m.insert(
        "file_name".into(),
        json!({"type": "string", "description": "File name of the recording, used for format detection"}),
    );
    let _ = m.insert(
        "save_dir".into(),
        json!({"type": "string", "description": "Directory to save the transcript as a Markdown note"}),
    );
    m
}

/// One registered transcription tool.
pub struct TranscribeTool {
    kind: ToolKind,
    pipeline: Pipeline,
}

impl TranscribeTool {
    /// Create a tool of the given kind over a shared pipeline.
    #[must_use]
    pub fn new(kind: ToolKind, pipeline: Pipeline) -> Self {
        Self { kind, pipeline }
    }
}

#[async_trait]
impl MurmurTool for TranscribeTool {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn definition(&self) -> Tool {
        self.kind.definition()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        info!(
            tool = self.kind.name(),
            tool_call_id = context.tool_call_id.as_deref().unwrap_or("-"),
            "tool invoked"
        );

        let result = async {
            let args = parse_common(params)?;
            let instruction = self.kind.instruction(&args)?;
            self.pipeline
                .run(&args, &instruction, self.kind.prepare_mode())
                .await
        }
        .await;

        match result {
            Ok(transcription) => {
                let details = serde_json::to_value(&transcription)?;
                Ok(ToolResult {
                    content: transcription.transcript,
                    details: Some(details),
                    is_error: None,
                })
            }
            Err(e) => {
                warn!(tool = self.kind.name(), error = %e, "tool failed");
                Ok(error_result(e.to_string()))
            }
        }
    }
}

/// Register the whole tool family over one shared pipeline.
pub fn register_all(registry: &mut ToolRegistry, pipeline: &Pipeline) {
    for kind in ALL_KINDS {
        registry.register(Arc::new(TranscribeTool::new(*kind, pipeline.clone())));
    }
}
