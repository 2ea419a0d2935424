//! Gemini Files API client.
//!
//! Implements the resumable-upload handshake, state polling, content
//! generation against an uploaded file, and deletion. The base URL is
//! injectable so tests can point the client at a local mock server.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::errors::GeminiError;

/// Processing state of a remote file.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    /// Upload received, server-side processing in progress.
    Processing,
    /// Ready for use in generation requests.
    Active,
    /// Server-side processing failed; the file is unusable.
    Failed,
    /// Any state this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// Handle to a file uploaded to the service.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFileHandle {
    /// Resource name, e.g. `files/abc123`.
    pub name: String,
    /// URI referenced by generation requests.
    pub uri: String,
    /// State as of the last observation.
    pub state: FileState,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: RemoteFileHandle,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// HTTP client for the Files API surface.
#[derive(Clone, Debug)]
pub struct FilesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FilesClient {
    /// Create a client against the production endpoint.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: trim_trailing_slash(base_url.into()),
            api_key: api_key.into(),
        }
    }

    /// Upload a local file via the resumable protocol.
    ///
    /// Two requests: a handshake that declares size and type and yields an
    /// upload URL, then a single body POST that finalizes the upload.
    pub async fn upload(
        &self,
        path: &Path,
        media_type: &str,
        display_name: &str,
    ) -> Result<RemoteFileHandle, GeminiError> {
        let bytes = tokio::fs::read(path).await?;

        let start = self
            .http
            .post(format!(
                "{}/upload/v1beta/files?key={}",
                self.base_url, self.api_key
            ))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len())
            .header("X-Goog-Upload-Header-Content-Type", media_type)
            .json(&json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;
        let start = check_status(start).await?;

        let upload_url = start
            .headers()
            .get("X-Goog-Upload-URL")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or(GeminiError::MissingUploadUrl)?;

        debug!(
            display_name,
            media_type,
            size_bytes = bytes.len(),
            "uploading audio"
        );

        let finalize = self
            .http
            .post(&upload_url)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .header("Content-Type", media_type)
            .body(bytes)
            .send()
            .await?;
        let finalize = check_status(finalize).await?;

        let response: UploadResponse = finalize.json().await?;
        Ok(response.file)
    }

    /// Fetch the current state of an uploaded file.
    pub async fn state(&self, name: &str) -> Result<RemoteFileHandle, GeminiError> {
        let response = self
            .http
            .get(format!(
                "{}/v1beta/{name}?key={}",
                self.base_url, self.api_key
            ))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Delete an uploaded file.
    pub async fn delete(&self, name: &str) -> Result<(), GeminiError> {
        let response = self
            .http
            .delete(format!(
                "{}/v1beta/{name}?key={}",
                self.base_url, self.api_key
            ))
            .send()
            .await?;
        let _ = check_status(response).await?;
        Ok(())
    }

    /// Ask the model to transcribe an uploaded file.
    ///
    /// Returns the concatenated text parts of the first candidate, or
    /// [`GeminiError::EmptyResponse`] if the model produced none.
    pub async fn generate(
        &self,
        model: &str,
        file: &RemoteFileHandle,
        media_type: &str,
        instruction: &str,
    ) -> Result<String, GeminiError> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": instruction },
                    { "file_data": { "mime_type": media_type, "file_uri": file.uri } }
                ]
            }]
        });

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{model}:generateContent?key={}",
                self.base_url, self.api_key
            ))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let parsed: GenerateResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Map a non-success status to [`GeminiError::Api`], keeping the body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GeminiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GeminiError::Api {
        status: status.as_u16(),
        body,
    })
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        let _ = url.pop();
    }
    url
}
