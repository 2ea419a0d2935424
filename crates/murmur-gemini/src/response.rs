//! Model-response parsing.
//!
//! The transcription instruction asks for a JSON object, but models wrap
//! output in code fences or ignore the request entirely often enough that
//! parsing has to be lenient: strip fences if present, try JSON, and fall
//! back to treating the whole reply as the transcript.

use serde::Deserialize;

/// Title used when the model provides none.
pub const FALLBACK_TITLE: &str = "Voice Note";

/// Description used when the reply could not be parsed as JSON.
pub const FALLBACK_DESCRIPTION: &str = "Automatically transcribed voice note";

/// Structured fields recovered from a model reply.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ParsedTranscript {
    /// Short human title.
    #[serde(default)]
    pub title: Option<String>,
    /// One-to-two sentence summary.
    #[serde(default)]
    pub description: Option<String>,
    /// The transcript body.
    #[serde(default)]
    pub transcript: Option<String>,
    /// Formatting label echoed back by formatted-output instructions.
    #[serde(default)]
    pub format_applied: Option<String>,
}

impl ParsedTranscript {
    /// Title, with the fallback applied.
    pub fn title_or_default(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(FALLBACK_TITLE)
    }
}

/// Parse a raw model reply into structured fields.
///
/// A successfully parsed object is returned as-is, missing fields left
/// absent. Never fails: a reply that is not JSON becomes a
/// [`ParsedTranscript`] whose `transcript` is the full reply verbatim, with
/// a generic description.
pub fn parse(raw: &str) -> ParsedTranscript {
    let stripped = strip_fences(raw);
    serde_json::from_str::<ParsedTranscript>(stripped).unwrap_or_else(|_| ParsedTranscript {
        description: Some(FALLBACK_DESCRIPTION.to_string()),
        transcript: Some(raw.to_string()),
        ..ParsedTranscript::default()
    })
}

/// Remove a surrounding Markdown code fence, tagged (```json) or bare.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line, if any.
    match body.split_once('\n') {
        Some((first_line, remainder)) if !first_line.trim().contains(' ') => remainder.trim(),
        _ => body.trim(),
    }
}
