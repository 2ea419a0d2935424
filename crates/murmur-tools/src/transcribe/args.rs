//! Request argument parsing shared by every transcription tool.
//!
//! Validation happens entirely before any I/O: the exactly-one-source rule
//! is checked here, so a malformed request never downloads, decodes, or
//! spawns anything.

use std::path::PathBuf;

use murmur_audio::AudioSource;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ToolError;

/// Raw argument shape accepted by every transcription tool.
#[derive(Debug, Default, Deserialize)]
pub struct RawArgs {
    /// Base64-encoded audio payload.
    #[serde(default)]
    pub audio_base64: Option<String>,
    /// URL to fetch audio from.
    #[serde(default)]
    pub url: Option<String>,
    /// Remote host to pull audio from over scp.
    #[serde(default)]
    pub host: Option<String>,
    /// Path on the remote host (required with `host`).
    #[serde(default)]
    pub remote_path: Option<String>,
    /// Remote user for scp.
    #[serde(default)]
    pub user: Option<String>,
    /// Remote ssh port.
    #[serde(default)]
    pub port: Option<u16>,
    /// File-name override, used for format classification and note naming.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Directory to save a Markdown note into.
    #[serde(default)]
    pub save_dir: Option<String>,
    /// Custom transcription instruction (custom tool only).
    #[serde(default)]
    pub instruction: Option<String>,
    /// Output format label (formatted tool only).
    #[serde(default)]
    pub format: Option<String>,
    /// Keep every word as spoken (voice-only tool).
    #[serde(default)]
    pub verbatim: Option<bool>,
}

/// Validated arguments common to every transcription tool.
#[derive(Debug)]
pub struct CommonArgs {
    /// Where the audio comes from.
    pub source: AudioSource,
    /// File-name override for classification.
    pub file_name: Option<String>,
    /// Directory to save a note into, if requested.
    pub save_dir: Option<PathBuf>,
    /// Per-tool extras parsed alongside.
    pub raw: RawArgs,
}

/// Parse and validate the JSON arguments shared by all tools.
pub fn parse_common(params: Value) -> Result<CommonArgs, ToolError> {
    let raw: RawArgs = serde_json::from_value(params)
        .map_err(|e| ToolError::validation(format!("malformed arguments: {e}")))?;

    let mut sources = 0;
    if raw.audio_base64.is_some() {
        sources += 1;
    }
    if raw.url.is_some() {
        sources += 1;
    }
    if raw.host.is_some() {
        sources += 1;
    }
    if sources != 1 {
        return Err(ToolError::validation(
            "provide exactly one audio source: audio_base64, url, or host + remote_path",
        ));
    }

    let file_name = raw.file_name.clone().filter(|n| !n.trim().is_empty());
    let source = if let Some(data) = raw.audio_base64.clone() {
        if data.trim().is_empty() {
            return Err(ToolError::validation("audio_base64 is empty"));
        }
        AudioSource::Inline {
            data,
            name: file_name.clone(),
        }
    } else if let Some(url) = raw.url.clone() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ToolError::validation("url must be http or https"));
        }
        AudioSource::Url {
            url,
            name: file_name.clone(),
        }
    } else {
        let host = raw
            .host
            .clone()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| ToolError::validation("host must not be empty"))?;
        let path = raw
            .remote_path
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ToolError::validation("remote_path is required with host"))?;
        AudioSource::Scp {
            host,
            path,
            user: raw.user.clone(),
            port: raw.port,
        }
    };

    let save_dir = raw
        .save_dir
        .clone()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from);

    Ok(CommonArgs {
        source,
        file_name,
        save_dir,
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inline_source_parses() {
        let args = parse_common(json!({"audio_base64": "aGk=", "file_name": "note.wav"})).unwrap();
        assert!(matches!(args.source, AudioSource::Inline { .. }));
        assert_eq!(args.file_name.as_deref(), Some("note.wav"));
    }

    #[test]
    fn url_source_parses() {
        let args = parse_common(json!({"url": "https://example.test/a.mp3"})).unwrap();
        assert!(matches!(args.source, AudioSource::Url { .. }));
    }

    #[test]
    fn scp_source_parses_with_options() {
        let args = parse_common(json!({
            "host": "studio.local",
            "remote_path": "/rec/take1.wav",
            "user": "amara",
            "port": 2222
        }))
        .unwrap();
        match args.source {
            AudioSource::Scp {
                host,
                path,
                user,
                port,
            } => {
                assert_eq!(host, "studio.local");
                assert_eq!(path, "/rec/take1.wav");
                assert_eq!(user.as_deref(), Some("amara"));
                assert_eq!(port, Some(2222));
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn no_source_is_rejected() {
        let err = parse_common(json!({})).unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[test]
    fn two_sources_are_rejected() {
        let err = parse_common(json!({
            "audio_base64": "aGk=",
            "url": "https://example.test/a.mp3"
        }))
        .unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[test]
    fn host_without_remote_path_is_rejected() {
        let err = parse_common(json!({"host": "studio.local"})).unwrap_err();
        assert!(err.to_string().contains("remote_path"));
    }

    #[test]
    fn blank_host_is_rejected() {
        let err = parse_common(json!({"host": "  ", "remote_path": "/rec/take1.wav"})).unwrap_err();
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = parse_common(json!({"url": "ftp://example.test/a.mp3"})).unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[test]
    fn empty_base64_is_rejected() {
        let err = parse_common(json!({"audio_base64": "  "})).unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[test]
    fn blank_save_dir_is_ignored() {
        let args = parse_common(json!({"audio_base64": "aGk=", "save_dir": "  "})).unwrap();
        assert!(args.save_dir.is_none());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let args = parse_common(json!({"audio_base64": "aGk=", "mystery": 1})).unwrap();
        assert!(matches!(args.source, AudioSource::Inline { .. }));
    }
}
