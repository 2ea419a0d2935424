//! Gemini-backed [`Transcriber`].

use std::path::Path;

use async_trait::async_trait;
use murmur_core::config::Config;
use murmur_gemini::{FilesClient, SessionConfig, TranscriptionSession};

use crate::errors::ToolError;
use crate::traits::Transcriber;

/// Production transcriber running the full Files API session.
#[derive(Clone, Debug)]
pub struct GeminiTranscriber {
    session: TranscriptionSession,
}

impl GeminiTranscriber {
    /// Build from process configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let client = FilesClient::new(&config.api_key, &config.base_url);
        let session = TranscriptionSession::new(
            client,
            SessionConfig {
                model: config.model.clone(),
                poll_interval: config.poll_interval,
                poll_ceiling: config.poll_ceiling,
            },
        );
        Self { session }
    }
}

#[async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe(
        &self,
        path: &Path,
        media_type: &str,
        display_name: &str,
        instruction: &str,
    ) -> Result<String, ToolError> {
        Ok(self
            .session
            .transcribe(path, media_type, display_name, instruction)
            .await?)
    }
}
