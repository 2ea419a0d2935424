//! Upload → poll → generate → delete, as one operation.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::errors::GeminiError;
use crate::files::{FileState, FilesClient, RemoteFileHandle};

/// Session tuning knobs.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Model identifier, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Delay between state polls.
    pub poll_interval: Duration,
    /// Total time to wait for the file to become active.
    pub poll_ceiling: Duration,
}

impl SessionConfig {
    /// Sensible defaults for the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            poll_interval: Duration::from_secs(1),
            poll_ceiling: Duration::from_secs(600),
        }
    }
}

/// Runs a complete transcription round-trip against the service.
///
/// The uploaded file is deleted before this returns, on success and on
/// failure alike. Deletion failures are logged and swallowed; the service
/// garbage-collects uploads after 48 hours, so a leaked file is a nuisance,
/// not a correctness problem.
#[derive(Clone, Debug)]
pub struct TranscriptionSession {
    client: FilesClient,
    config: SessionConfig,
}

impl TranscriptionSession {
    /// Build a session over an existing client.
    pub fn new(client: FilesClient, config: SessionConfig) -> Self {
        Self { client, config }
    }

    /// Transcribe a local audio file.
    pub async fn transcribe(
        &self,
        path: &Path,
        media_type: &str,
        display_name: &str,
        instruction: &str,
    ) -> Result<String, GeminiError> {
        let handle = self.client.upload(path, media_type, display_name).await?;
        info!(name = %handle.name, display_name, "audio uploaded");

        let outcome = self.generate_when_active(&handle, media_type, instruction).await;

        if let Err(e) = self.client.delete(&handle.name).await {
            warn!(name = %handle.name, error = %e, "failed to delete uploaded file");
        }

        outcome
    }

    async fn generate_when_active(
        &self,
        handle: &RemoteFileHandle,
        media_type: &str,
        instruction: &str,
    ) -> Result<String, GeminiError> {
        let active = self.await_active(handle).await?;
        self.client
            .generate(&self.config.model, &active, media_type, instruction)
            .await
    }

    /// Poll until the file is active, failed, or the ceiling is hit.
    async fn await_active(
        &self,
        handle: &RemoteFileHandle,
    ) -> Result<RemoteFileHandle, GeminiError> {
        if handle.state == FileState::Active {
            return Ok(handle.clone());
        }

        let mut waited = Duration::ZERO;
        loop {
            if waited >= self.config.poll_ceiling {
                return Err(GeminiError::Timeout {
                    waited_secs: waited.as_secs(),
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
            waited += self.config.poll_interval;

            let current = self.client.state(&handle.name).await?;
            match current.state {
                FileState::Active => return Ok(current),
                FileState::Failed => {
                    return Err(GeminiError::ProcessingFailed {
                        name: current.name,
                    })
                }
                FileState::Processing | FileState::Unknown => {
                    debug!(name = %handle.name, waited_secs = waited.as_secs(), "file not active yet");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn file_json(state: &str) -> serde_json::Value {
        json!({
            "name": "files/abc123",
            "uri": "https://files.example/abc123",
            "state": state
        })
    }

    fn fast_config() -> SessionConfig {
        SessionConfig {
            model: "gemini-2.5-flash".into(),
            poll_interval: Duration::from_millis(5),
            poll_ceiling: Duration::from_millis(50),
        }
    }

    async fn session(server: &MockServer) -> TranscriptionSession {
        TranscriptionSession::new(FilesClient::new("test-key", server.uri()), fast_config())
    }

    async fn mount_upload(server: &MockServer, state: &str) {
        Mock::given(method("POST"))
            .and(path("/upload/v1beta/files"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Goog-Upload-URL", format!("{}/put/xyz", server.uri())),
            )
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/put/xyz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "file": file_json(state) })))
            .mount(server)
            .await;
    }

    fn audio_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("note.ogg");
        std::fs::write(&path, b"opus bytes").unwrap();
        path
    }

    #[tokio::test]
    async fn full_round_trip_deletes_file_after_success() {
        let server = MockServer::start().await;
        mount_upload(&server, "PROCESSING").await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_json("ACTIVE")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "the transcript" }] } }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let text = session(&server)
            .await
            .transcribe(&audio_file(&dir), "audio/ogg", "note.ogg", "transcribe")
            .await
            .unwrap();
        assert_eq!(text, "the transcript");
    }

    #[tokio::test]
    async fn active_at_upload_skips_polling() {
        let server = MockServer::start().await;
        mount_upload(&server, "ACTIVE").await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_json("ACTIVE")))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let text = session(&server)
            .await
            .transcribe(&audio_file(&dir), "audio/ogg", "note.ogg", "transcribe")
            .await
            .unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn processing_failure_still_deletes_file() {
        let server = MockServer::start().await;
        mount_upload(&server, "PROCESSING").await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_json("FAILED")))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let err = session(&server)
            .await
            .transcribe(&audio_file(&dir), "audio/ogg", "note.ogg", "transcribe")
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::ProcessingFailed { .. }));
    }

    #[tokio::test]
    async fn never_active_times_out_and_deletes_file() {
        let server = MockServer::start().await;
        mount_upload(&server, "PROCESSING").await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_json("PROCESSING")))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let err = session(&server)
            .await
            .transcribe(&audio_file(&dir), "audio/ogg", "note.ogg", "transcribe")
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::Timeout { .. }));
    }

    #[tokio::test]
    async fn delete_failure_does_not_mask_transcript() {
        let server = MockServer::start().await;
        mount_upload(&server, "ACTIVE").await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "kept" }] } }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let text = session(&server)
            .await
            .transcribe(&audio_file(&dir), "audio/ogg", "note.ogg", "transcribe")
            .await
            .unwrap();
        assert_eq!(text, "kept");
    }
}
