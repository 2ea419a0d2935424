//! ffmpeg-backed normalization.
//!
//! Decides whether an acquired recording can be submitted as-is or must be
//! re-encoded first, and runs the re-encode when needed. The target encoding
//! is mono 16 kHz Opus at 24 kbps in an Ogg container, tuned for voice —
//! small enough to upload quickly without hurting transcription quality.

use std::path::Path;
use std::process::Stdio;

use tracing::{debug, info};

use crate::errors::AudioError;
use crate::format::is_native;
use crate::temp::{scratch_path, PreparedAudio};
use crate::vad::{isolate_speech, VadConfig};

/// Media type of transcoder output.
pub const COMPRESSED_MEDIA_TYPE: &str = "audio/ogg";

/// How aggressively to normalize before submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrepareMode {
    /// Re-encode only when the format is not natively accepted or the file
    /// exceeds the downsample threshold.
    Standard,
    /// Always re-encode, regardless of format or size.
    Compress,
    /// Strip non-speech audio via energy segmentation, then re-encode.
    VoiceActivity,
}

/// Normalizes acquired audio for submission.
#[derive(Clone, Debug)]
pub struct Transcoder {
    downsample_threshold: u64,
    vad: VadConfig,
}

impl Transcoder {
    /// Create a transcoder that re-encodes files above `downsample_threshold`
    /// bytes even when their format is natively accepted.
    pub fn new(downsample_threshold: u64) -> Self {
        Self {
            downsample_threshold,
            vad: VadConfig::default(),
        }
    }

    /// Override the segmentation parameters.
    #[must_use]
    pub fn with_vad(mut self, vad: VadConfig) -> Self {
        self.vad = vad;
        self
    }

    /// Normalize `prepared` according to `mode`.
    ///
    /// Consumes and returns the cleanup guard so every file created along the
    /// way is removed on any exit path. Intermediate files (the PCM WAV used
    /// for segmentation) are unlinked eagerly rather than tracked.
    pub async fn prepare(
        &self,
        prepared: PreparedAudio,
        mode: PrepareMode,
    ) -> Result<PreparedAudio, AudioError> {
        let size = tokio::fs::metadata(prepared.path()).await?.len();
        if !needs_transcode(prepared.media_type(), size, self.downsample_threshold, mode) {
            debug!(
                media_type = prepared.media_type(),
                size_bytes = size,
                "audio accepted as-is"
            );
            return Ok(prepared);
        }

        if mode == PrepareMode::VoiceActivity {
            return self.prepare_voice_only(prepared).await;
        }

        let output = scratch_path("ogg");
        info!(
            input = %prepared.path().display(),
            media_type = prepared.media_type(),
            size_bytes = size,
            "re-encoding audio"
        );
        run_ffmpeg(&compress_args(prepared.path(), &output), &output).await?;
        Ok(prepared.with_output(output, COMPRESSED_MEDIA_TYPE))
    }

    /// Segment speech out of the recording, then compress the result.
    ///
    /// Falls back to plain compression of the original when no speech spans
    /// are found.
    async fn prepare_voice_only(
        &self,
        prepared: PreparedAudio,
    ) -> Result<PreparedAudio, AudioError> {
        let pcm = scratch_path("wav");
        run_ffmpeg(&pcm_args(prepared.path(), &pcm), &pcm).await?;

        let isolated = scratch_path("wav");
        let joined = {
            let vad = self.vad.clone();
            let pcm_in = pcm.clone();
            let isolated_out = isolated.clone();
            tokio::task::spawn_blocking(move || isolate_speech(&pcm_in, &isolated_out, &vad)).await
        };
        let _ = tokio::fs::remove_file(&pcm).await;
        let has_speech = match joined {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                let _ = tokio::fs::remove_file(&isolated).await;
                return Err(e);
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&isolated).await;
                return Err(AudioError::Wav {
                    message: format!("segmentation task failed: {e}"),
                });
            }
        };

        let output = scratch_path("ogg");
        let compress_input = if has_speech {
            isolated.as_path()
        } else {
            info!("segmentation found no speech, compressing original audio");
            prepared.path()
        };
        let encode = run_ffmpeg(&compress_args(compress_input, &output), &output).await;
        if has_speech {
            let _ = tokio::fs::remove_file(&isolated).await;
        }
        encode?;

        Ok(prepared.with_output(output, COMPRESSED_MEDIA_TYPE))
    }
}

/// Whether the recording must be re-encoded before submission.
fn needs_transcode(media_type: &str, size: u64, threshold: u64, mode: PrepareMode) -> bool {
    match mode {
        PrepareMode::Compress | PrepareMode::VoiceActivity => true,
        PrepareMode::Standard => !is_native(media_type) || size > threshold,
    }
}

/// ffmpeg arguments for the voice-tuned Opus target encoding.
fn compress_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-vn".into(),
        "-ac".into(),
        "1".into(),
        "-ar".into(),
        "16000".into(),
        "-c:a".into(),
        "libopus".into(),
        "-b:a".into(),
        "24k".into(),
        "-application".into(),
        "voip".into(),
        "-y".into(),
        output.to_string_lossy().into_owned(),
    ]
}

/// ffmpeg arguments for the mono 16 kHz PCM intermediate used by
/// segmentation.
fn pcm_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-vn".into(),
        "-ac".into(),
        "1".into(),
        "-ar".into(),
        "16000".into(),
        "-c:a".into(),
        "pcm_s16le".into(),
        "-y".into(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Run ffmpeg, removing `output_path` on any failure.
async fn run_ffmpeg(args: &[String], output_path: &Path) -> Result<(), AudioError> {
    run_encoder("ffmpeg", args, output_path).await
}

/// Run an encoder subprocess, mapping failures to [`AudioError`].
///
/// `output_path` is the file the invocation writes; on any failure it may
/// exist partially written, so it is removed before the error returns. The
/// program name is a parameter so the failure paths are testable without a
/// real encode.
async fn run_encoder(
    program: &str,
    args: &[String],
    output_path: &Path,
) -> Result<(), AudioError> {
    let result = spawn_encoder(program, args).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(output_path).await;
    }
    result
}

async fn spawn_encoder(program: &str, args: &[String]) -> Result<(), AudioError> {
    let output = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AudioError::ToolUnavailable { tool: "ffmpeg" }
            } else {
                AudioError::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // ffmpeg banners are long; keep the tail where the actual error is.
        let tail: String = stderr
            .lines()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n");
        return Err(AudioError::TranscodeFailed { stderr: tail });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn native_small_standard_is_accepted_as_is() {
        assert!(!needs_transcode("audio/wav", 5 * MIB, 15 * MIB, PrepareMode::Standard));
        assert!(!needs_transcode("audio/mpeg", 15 * MIB, 15 * MIB, PrepareMode::Standard));
    }

    #[test]
    fn non_native_standard_requires_transcode() {
        assert!(needs_transcode("audio/webm", MIB, 15 * MIB, PrepareMode::Standard));
        assert!(needs_transcode(
            "application/octet-stream",
            MIB,
            15 * MIB,
            PrepareMode::Standard
        ));
    }

    #[test]
    fn oversized_native_standard_requires_transcode() {
        assert!(needs_transcode("audio/wav", 15 * MIB + 1, 15 * MIB, PrepareMode::Standard));
    }

    #[test]
    fn compress_mode_always_transcodes() {
        assert!(needs_transcode("audio/ogg", 1, 15 * MIB, PrepareMode::Compress));
        assert!(needs_transcode("audio/wav", 1, 15 * MIB, PrepareMode::VoiceActivity));
    }

    #[test]
    fn compress_args_target_voice_opus() {
        let args = compress_args(Path::new("/tmp/in.webm"), Path::new("/tmp/out.ogg"));
        let joined = args.join(" ");
        assert!(joined.contains("-ac 1"));
        assert!(joined.contains("-ar 16000"));
        assert!(joined.contains("-c:a libopus"));
        assert!(joined.contains("-b:a 24k"));
        assert!(joined.contains("-application voip"));
        assert!(joined.contains("-y"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.ogg"));
    }

    #[test]
    fn pcm_args_target_mono_16k_s16() {
        let args = pcm_args(Path::new("/tmp/in.ogg"), Path::new("/tmp/out.wav"));
        let joined = args.join(" ");
        assert!(joined.contains("-ac 1"));
        assert!(joined.contains("-ar 16000"));
        assert!(joined.contains("-c:a pcm_s16le"));
    }

    #[tokio::test]
    async fn standard_mode_no_op_keeps_original_path() {
        let path = scratch_path("wav");
        std::fs::write(&path, vec![0u8; 1024]).unwrap();
        let prepared = PreparedAudio::new(path.clone(), "audio/wav");

        let transcoder = Transcoder::new(15 * MIB);
        let out = transcoder
            .prepare(prepared, PrepareMode::Standard)
            .await
            .unwrap();
        assert_eq!(out.path(), path.as_path());
        assert_eq!(out.media_type(), "audio/wav");
        drop(out);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_encoder_removes_partial_output() {
        let output = scratch_path("ogg");
        std::fs::write(&output, b"partial").unwrap();
        let args = compress_args(Path::new("/nonexistent/in.wav"), &output);
        let err = run_encoder("encoder-that-does-not-exist", &args, &output)
            .await
            .unwrap_err();
        assert!(matches!(err, AudioError::ToolUnavailable { .. }));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn failed_encode_removes_partial_output() {
        let output = scratch_path("ogg");
        std::fs::write(&output, b"partial").unwrap();
        let args = vec!["-c".to_string(), "echo bad input >&2; exit 1".to_string()];
        let err = run_encoder("sh", &args, &output).await.unwrap_err();
        match err {
            AudioError::TranscodeFailed { stderr } => assert!(stderr.contains("bad input")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn successful_run_keeps_output() {
        let output = scratch_path("ogg");
        std::fs::write(&output, b"encoded").unwrap();
        let args = vec!["-c".to_string(), "exit 0".to_string()];
        run_encoder("sh", &args, &output).await.unwrap();
        assert!(output.exists());
        let _ = std::fs::remove_file(&output);
    }

    #[tokio::test]
    async fn missing_input_file_is_io_error() {
        let prepared = PreparedAudio::new(scratch_path("wav"), "audio/wav");
        let transcoder = Transcoder::new(15 * MIB);
        let err = transcoder
            .prepare(prepared, PrepareMode::Standard)
            .await
            .unwrap_err();
        assert!(matches!(err, AudioError::Io(_)));
    }
}
