//! Transcription instructions sent alongside the audio.
//!
//! All instructions ask for the same JSON envelope so the response parser
//! has one shape to recover; they differ only in how the transcript body is
//! to be rendered.

const JSON_ENVELOPE: &str = "Respond with a single JSON object and nothing else, with keys \
\"title\" (a short descriptive title, at most eight words), \"description\" (one or two \
sentences summarizing the recording), and \"transcript\" (the transcription itself).";

/// Default: a lightly cleaned-up transcript.
pub fn default_instruction() -> String {
    format!(
        "Transcribe this audio recording. Remove filler words and false starts, fix obvious \
grammatical slips, and break the text into paragraphs, but do not summarize or omit content. \
{JSON_ENVELOPE}"
    )
}

/// Verbatim: every word as spoken.
pub fn verbatim_instruction() -> String {
    format!(
        "Transcribe this audio recording verbatim. Keep every word exactly as spoken, including \
filler words, repetitions, and false starts. {JSON_ENVELOPE}"
    )
}

/// Caller-supplied instruction, wrapped in the JSON envelope.
pub fn custom_instruction(instruction: &str) -> String {
    format!("{instruction}\n\nThe audio recording is attached. {JSON_ENVELOPE}")
}

/// Render the transcript in a named format (bullet points, meeting minutes...).
pub fn formatted_instruction(format: &str) -> String {
    format!(
        "Transcribe this audio recording and render the transcript as: {format}. {JSON_ENVELOPE} \
Additionally include the key \"format_applied\" echoing the format you used."
    )
}

/// Restructure a spoken project description into a written specification.
pub fn project_spec_instruction() -> String {
    format!(
        "This recording is someone describing a software project out loud. Turn it into a \
written project specification in Markdown: goals, requirements, constraints, and open \
questions, each under its own heading. Preserve every requirement mentioned, even in passing. \
Put the full Markdown document in the \"transcript\" field. {JSON_ENVELOPE}"
    )
}
