//! Transport acquisition.
//!
//! Resolves one of three mutually exclusive input specifications — inline
//! base64 payload, remote URL, or remote-host scp pull — into a local
//! temporary file, then applies the common size gate before any transcoding
//! happens.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use base64::Engine;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::errors::AudioError;
use crate::temp::scratch_path;

const MIB: u64 = 1024 * 1024;

/// One audio input specification. Exactly one variant per request.
#[derive(Clone, Debug)]
pub enum AudioSource {
    /// Base64-encoded payload embedded in the request.
    Inline {
        /// The encoded audio bytes (data-URI prefix tolerated).
        data: String,
        /// Optional display name (drives extension-based classification).
        name: Option<String>,
    },
    /// Audio fetched from a remote URL.
    Url {
        /// The URL to fetch.
        url: String,
        /// Optional display-name override.
        name: Option<String>,
    },
    /// Audio pulled from a remote host over scp.
    Scp {
        /// Remote host name or address.
        host: String,
        /// Absolute path on the remote host.
        path: String,
        /// Optional remote user.
        user: Option<String>,
        /// Optional ssh port.
        port: Option<u16>,
    },
}

/// A locally materialized recording.
#[derive(Debug)]
pub struct AcquiredAudio {
    /// Path of the temp file holding the audio bytes.
    pub path: PathBuf,
    /// Display name used for classification and logging.
    pub display_name: String,
    /// Content type declared by the transport, when one was.
    pub content_type: Option<String>,
}

/// Resolves an [`AudioSource`] into a local temp file.
pub struct Acquirer {
    http: reqwest::Client,
    max_file_bytes: u64,
}

impl Acquirer {
    /// Create an acquirer enforcing the given size ceiling.
    pub fn new(max_file_bytes: u64) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(30))
                .user_agent("murmur/0.1")
                .build()
                .unwrap_or_default(),
            max_file_bytes,
        }
    }

    /// Materialize the source locally and enforce the size gate.
    ///
    /// On success the caller owns the returned temp file (wrap it in
    /// [`crate::PreparedAudio`] promptly). An oversized file is deleted here
    /// before the error returns.
    pub async fn acquire(&self, source: &AudioSource) -> Result<AcquiredAudio, AudioError> {
        let acquired = match source {
            AudioSource::Inline { data, name } => self.acquire_inline(data, name.as_deref()).await?,
            AudioSource::Url { url, name } => self.fetch_url(url, name.as_deref()).await?,
            AudioSource::Scp {
                host,
                path,
                user,
                port,
            } => self.scp_pull(host, path, user.as_deref(), *port).await?,
        };

        let size = tokio::fs::metadata(&acquired.path).await?.len();
        if size > self.max_file_bytes {
            let _ = tokio::fs::remove_file(&acquired.path).await;
            return Err(AudioError::FileTooLarge {
                size_mib: (size + MIB / 2) / MIB,
                max_mib: self.max_file_bytes / MIB,
            });
        }

        debug!(path = %acquired.path.display(), size, name = %acquired.display_name, "audio acquired");
        Ok(acquired)
    }

    async fn acquire_inline(
        &self,
        data: &str,
        name: Option<&str>,
    ) -> Result<AcquiredAudio, AudioError> {
        let cleaned = normalize_base64(data);
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| AudioError::InvalidPayload {
                message: format!("invalid base64 audio data: {e}"),
            })?;
        if bytes.is_empty() {
            return Err(AudioError::InvalidPayload {
                message: "decoded payload is empty".into(),
            });
        }

        let display_name = name.unwrap_or("inline-audio").to_string();
        let path = scratch_path(extension_of(&display_name));
        tokio::fs::write(&path, &bytes).await?;
        Ok(AcquiredAudio {
            path,
            display_name,
            content_type: None,
        })
    }

    /// Stream the response body straight to disk; large recordings must not
    /// be buffered whole in memory.
    async fn fetch_url(&self, url: &str, name: Option<&str>) -> Result<AcquiredAudio, AudioError> {
        info!(url, "fetching remote audio");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AudioError::FetchFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let display_name = name
            .map(String::from)
            .or_else(|| url_basename(url))
            .unwrap_or_else(|| "remote-audio".to_string());

        let path = scratch_path(extension_of(&display_name));
        write_stream_to(&path, response.bytes_stream()).await?;

        Ok(AcquiredAudio {
            path,
            display_name,
            content_type,
        })
    }

    async fn scp_pull(
        &self,
        host: &str,
        remote_path: &str,
        user: Option<&str>,
        port: Option<u16>,
    ) -> Result<AcquiredAudio, AudioError> {
        let display_name = remote_path
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("remote-audio")
            .to_string();
        let local = scratch_path(extension_of(&display_name));

        let args = scp_args(host, remote_path, user, port, &local.to_string_lossy());
        info!(host, remote_path, "pulling audio over scp");

        let output = tokio::process::Command::new("scp")
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AudioError::ToolUnavailable { tool: "scp" },
                _ => AudioError::Io(e),
            })?;

        if !output.status.success() {
            let _ = tokio::fs::remove_file(&local).await;
            return Err(AudioError::TransferFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(AcquiredAudio {
            path: local,
            display_name,
            content_type: None,
        })
    }
}

/// Stream chunks to `path`. On any failure — a transport error mid-body or
/// a local write error — the partially written file is removed before the
/// error returns.
async fn write_stream_to<S, E>(path: &Path, stream: S) -> Result<(), AudioError>
where
    S: futures::Stream<Item = Result<bytes::Bytes, E>>,
    AudioError: From<E>,
{
    let result = async {
        let mut stream = std::pin::pin!(stream);
        let mut file = tokio::fs::File::create(path).await?;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(AudioError::from)?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }
    .await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(path).await;
    }
    result
}

/// Build the scp argument vector (kept pure for testing).
fn scp_args(
    host: &str,
    remote_path: &str,
    user: Option<&str>,
    port: Option<u16>,
    local_path: &str,
) -> Vec<String> {
    let mut args = vec!["-q".to_string(), "-o".to_string(), "BatchMode=yes".to_string()];
    if let Some(port) = port {
        args.push("-P".to_string());
        args.push(port.to_string());
    }
    let remote = match user {
        Some(user) => format!("{user}@{host}:{remote_path}"),
        None => format!("{host}:{remote_path}"),
    };
    args.push(remote);
    args.push(local_path.to_string());
    args
}

/// Strip a data-URI prefix and embedded whitespace from a base64 payload
/// (mobile clients send `data:audio/m4a;base64,...`).
fn normalize_base64(data: &str) -> String {
    let body = match data.find("base64,") {
        Some(idx) if data.starts_with("data:") => &data[idx + "base64,".len()..],
        _ => data,
    };
    body.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Basename of a URL path, ignoring query and fragment.
fn url_basename(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let base = without_query.rsplit('/').next()?;
    if base.is_empty() || base.contains(':') {
        None
    } else {
        Some(base.to_string())
    }
}

/// Extension of a display name, falling back to `bin`.
fn extension_of(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && !ext.contains('/') => ext,
        _ => "bin",
    }
}
