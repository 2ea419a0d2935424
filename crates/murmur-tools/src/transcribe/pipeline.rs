//! The acquire→normalize→transcribe→save pipeline shared by every tool.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use murmur_audio::{classify, Acquirer, PrepareMode, PreparedAudio, Transcoder};
use murmur_core::config::Config;
use murmur_gemini::response;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::ToolError;
use crate::traits::Transcriber;
use crate::transcribe::args::CommonArgs;
use crate::transcribe::save::save_note;

/// A finished transcription, as returned to the caller.
#[derive(Clone, Debug, Serialize)]
pub struct Transcription {
    /// Short human title (falls back to `Voice Note`).
    pub title: String,
    /// One-to-two sentence summary, when the model provided one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The transcript body.
    pub transcript: String,
    /// RFC 3339 completion timestamp.
    pub timestamp: String,
    /// Human-readable completion timestamp, e.g. `27 Nov 2025 16:58`.
    pub timestamp_readable: String,
    /// Path of the saved Markdown note, when saving was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
    /// Format label echoed by formatted-output instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_applied: Option<String>,
}

/// Shared pipeline state, cheap to clone per tool.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<Config>,
    acquirer: Arc<Acquirer>,
    transcoder: Transcoder,
    transcriber: Arc<dyn Transcriber>,
}

impl Pipeline {
    /// Assemble the pipeline from configuration and a transcriber.
    #[must_use]
    pub fn new(config: Arc<Config>, transcriber: Arc<dyn Transcriber>) -> Self {
        let acquirer = Arc::new(Acquirer::new(config.max_file_bytes));
        let transcoder = Transcoder::new(config.downsample_threshold_bytes);
        Self {
            config,
            acquirer,
            transcoder,
            transcriber,
        }
    }

    /// Run one transcription end to end.
    ///
    /// Every temp file created along the way is owned by a [`PreparedAudio`]
    /// guard, so failures at any stage leave nothing behind.
    pub async fn run(
        &self,
        args: &CommonArgs,
        instruction: &str,
        mode: PrepareMode,
    ) -> Result<Transcription, ToolError> {
        let acquired = self.acquirer.acquire(&args.source).await?;
        let display_name = args
            .file_name
            .clone()
            .unwrap_or_else(|| acquired.display_name.clone());
        let media_type = classify(Some(&display_name), acquired.content_type.as_deref());
        debug!(display_name, media_type, "audio classified");

        let prepared = PreparedAudio::new(acquired.path, media_type);
        let prepared = self.transcoder.prepare(prepared, mode).await?;

        let raw = self
            .transcriber
            .transcribe(
                prepared.path(),
                prepared.media_type(),
                &display_name,
                instruction,
            )
            .await?;
        drop(prepared);

        let parsed = response::parse(&raw);
        let now = Utc::now();
        let mut transcription = Transcription {
            title: parsed.title_or_default().to_string(),
            description: parsed.description.clone(),
            transcript: parsed.transcript.clone().unwrap_or_default(),
            timestamp: now.to_rfc3339(),
            timestamp_readable: readable_timestamp(now),
            saved_to: None,
            format_applied: parsed.format_applied.clone(),
        };

        let save_dir = args
            .save_dir
            .clone()
            .or_else(|| self.config.notes_dir.clone());
        if let Some(dir) = save_dir {
            let path = save_note(&dir, &transcription, now).await?;
            transcription.saved_to = Some(path.to_string_lossy().into_owned());
        }

        info!(title = %transcription.title, saved = transcription.saved_to.is_some(), "transcription complete");
        Ok(transcription)
    }
}

/// Format a timestamp the way it appears in results: `27 Nov 2025 16:58`.
fn readable_timestamp(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y %H:%M").to_string()
}
