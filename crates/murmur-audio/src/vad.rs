//! Energy-based voice-activity segmentation.
//!
//! Operates on mono 16 kHz PCM produced by the transcoder's intermediate
//! step. Frames are scored by normalized RMS energy; a small state machine
//! with onset/offset hysteresis opens a span when energy crosses the onset
//! threshold, keeps it open through up to `redemption_frames` quiet frames,
//! and discards spans shorter than `min_speech_frames`. Spans are padded
//! with `pre_pad_frames` of leading context, then spliced together with a
//! fixed silence gap between them.

use std::ops::Range;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::AudioError;

/// Sample rate the segmentation pass operates at.
pub const VAD_SAMPLE_RATE: u32 = 16_000;

/// Segmentation parameters.
#[derive(Clone, Debug)]
pub struct VadConfig {
    /// Samples per analysis frame (480 = 30 ms at 16 kHz).
    pub frame_samples: usize,
    /// Normalized RMS at or above which a frame counts as speech onset.
    pub onset_threshold: f32,
    /// Normalized RMS below which an open span counts a quiet frame.
    pub offset_threshold: f32,
    /// Minimum consecutive speech frames for a span to be kept.
    pub min_speech_frames: usize,
    /// Frames of leading context prepended to each span.
    pub pre_pad_frames: usize,
    /// Quiet frames tolerated before a span closes.
    pub redemption_frames: usize,
    /// Samples of silence inserted between spliced spans (1600 = 100 ms).
    pub gap_samples: usize,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            frame_samples: 480,
            onset_threshold: 0.025,
            offset_threshold: 0.012,
            min_speech_frames: 3,
            pre_pad_frames: 4,
            redemption_frames: 8,
            gap_samples: 1600,
        }
    }
}

/// Normalized RMS energy of one frame.
fn frame_rms(frame: &[i16]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f64 = frame
        .iter()
        .map(|&s| {
            let v = f64::from(s) / f64::from(i16::MAX);
            v * v
        })
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / frame.len() as f64;
    #[allow(clippy::cast_possible_truncation)]
    let rms = mean.sqrt() as f32;
    rms
}

/// Detect speech-bearing sample spans, in original order.
pub fn detect_speech_spans(samples: &[i16], config: &VadConfig) -> Vec<Range<usize>> {
    let frame = config.frame_samples.max(1);
    let frame_count = samples.len() / frame;

    let mut spans: Vec<Range<usize>> = Vec::new();
    let mut span_start: Option<usize> = None;
    let mut speech_frames = 0usize;
    let mut quiet_frames = 0usize;
    let mut last_speech_frame = 0usize;

    for i in 0..frame_count {
        let rms = frame_rms(&samples[i * frame..(i + 1) * frame]);
        match span_start {
            None => {
                if rms >= config.onset_threshold {
                    span_start = Some(i);
                    speech_frames = 1;
                    quiet_frames = 0;
                    last_speech_frame = i;
                }
            }
            Some(start) => {
                if rms >= config.offset_threshold {
                    speech_frames += 1;
                    quiet_frames = 0;
                    last_speech_frame = i;
                } else {
                    quiet_frames += 1;
                    if quiet_frames > config.redemption_frames {
                        if speech_frames >= config.min_speech_frames {
                            spans.push(padded_span(start, last_speech_frame, config, samples.len()));
                        }
                        span_start = None;
                    }
                }
            }
        }
    }

    if let Some(start) = span_start {
        if speech_frames >= config.min_speech_frames {
            spans.push(padded_span(start, last_speech_frame, config, samples.len()));
        }
    }

    merge_overlapping(spans)
}

/// Convert a frame range into a sample range with pre-roll padding.
fn padded_span(
    start_frame: usize,
    last_speech_frame: usize,
    config: &VadConfig,
    total_samples: usize,
) -> Range<usize> {
    let frame = config.frame_samples;
    let start = start_frame.saturating_sub(config.pre_pad_frames) * frame;
    let end = ((last_speech_frame + 1) * frame).min(total_samples);
    start..end
}

/// Merge spans whose padded ranges touch or overlap.
fn merge_overlapping(spans: Vec<Range<usize>>) -> Vec<Range<usize>> {
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(prev) if span.start <= prev.end => prev.end = prev.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Concatenate spans in order, inserting a silence gap between consecutive
/// spans to avoid splicing artifacts.
pub fn splice_spans(samples: &[i16], spans: &[Range<usize>], gap_samples: usize) -> Vec<i16> {
    let mut out = Vec::new();
    for (i, span) in spans.iter().enumerate() {
        if i > 0 {
            out.extend(std::iter::repeat_n(0i16, gap_samples));
        }
        out.extend_from_slice(&samples[span.start..span.end.min(samples.len())]);
    }
    out
}

/// Run segmentation over a mono 16 kHz PCM WAV file.
///
/// Writes the speech-only audio to `output` and returns `true`. If no speech
/// spans are detected, writes nothing and returns `false` — the caller falls
/// back to the original input rather than submitting an empty file.
pub fn isolate_speech(
    input: &Path,
    output: &Path,
    config: &VadConfig,
) -> Result<bool, AudioError> {
    let mut reader = hound::WavReader::open(input).map_err(|e| AudioError::Wav {
        message: format!("failed to open {}: {e}", input.display()),
    })?;
    let spec = reader.spec();
    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .map_err(|e| AudioError::Wav {
            message: format!("failed to decode samples: {e}"),
        })?;

    let spans = detect_speech_spans(&samples, config);
    if spans.is_empty() {
        info!(input = %input.display(), "no speech spans detected, keeping original audio");
        return Ok(false);
    }

    let kept: usize = spans.iter().map(|s| s.end - s.start).sum();
    debug!(
        spans = spans.len(),
        kept_samples = kept,
        total_samples = samples.len(),
        "speech spans detected"
    );

    let spliced = splice_spans(&samples, &spans, config.gap_samples);
    let mut writer = hound::WavWriter::create(
        output,
        hound::WavSpec {
            channels: 1,
            sample_rate: spec.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        },
    )
    .map_err(|e| AudioError::Wav {
        message: format!("failed to create {}: {e}", output.display()),
    })?;
    for sample in spliced {
        writer.write_sample(sample).map_err(|e| AudioError::Wav {
            message: format!("failed to write sample: {e}"),
        })?;
    }
    writer.finalize().map_err(|e| AudioError::Wav {
        message: format!("failed to finalize wav: {e}"),
    })?;

    Ok(true)
}
