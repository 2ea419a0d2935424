//! Markdown note persistence.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::ToolError;
use crate::transcribe::pipeline::Transcription;

/// Maximum length of a file-name slug.
const MAX_SLUG_LEN: usize = 80;

/// Turn a title into a safe file-name slug.
///
/// Lowercases, drops everything but letters, digits, spaces, and hyphens,
/// collapses runs of whitespace into single hyphens, and truncates. An empty
/// result falls back to `voice-note`.
pub fn slugify(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    let mut last_hyphen = true; // suppress leading hyphens
    for c in cleaned.chars() {
        if c.is_whitespace() || c == '-' {
            if !last_hyphen {
                slug.push('-');
                last_hyphen = true;
            }
        } else {
            slug.push(c);
            last_hyphen = false;
        }
    }
    while slug.ends_with('-') {
        let _ = slug.pop();
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            let _ = slug.pop();
        }
    }

    if slug.is_empty() {
        "voice-note".to_string()
    } else {
        slug
    }
}

/// Render the Markdown note for a finished transcription.
fn render_note(transcription: &Transcription, created: DateTime<Utc>) -> String {
    let mut note = String::new();
    note.push_str("---\n");
    note.push_str(&format!("title: {}\n", transcription.title));
    note.push_str(&format!("created: {}\n", created.to_rfc3339()));
    if let Some(desc) = &transcription.description {
        note.push_str(&format!("description: {desc}\n"));
    }
    if let Some(format) = &transcription.format_applied {
        note.push_str(&format!("format: {format}\n"));
    }
    note.push_str("---\n\n");
    note.push_str(&format!("# {}\n\n", transcription.title));
    note.push_str(&transcription.transcript);
    note.push('\n');
    note
}

/// Write the transcription as a Markdown note under `dir`.
///
/// Creates the directory if needed. The file name is the slugified title
/// plus a timestamp, so repeated recordings with the same title never
/// collide.
pub async fn save_note(
    dir: &Path,
    transcription: &Transcription,
    created: DateTime<Utc>,
) -> Result<PathBuf, ToolError> {
    tokio::fs::create_dir_all(dir).await?;

    let file_name = format!(
        "{}-{}.md",
        slugify(&transcription.title),
        created.format("%Y%m%d-%H%M%S")
    );
    let path = dir.join(file_name);
    tokio::fs::write(&path, render_note(transcription, created)).await?;

    info!(path = %path.display(), "transcript note saved");
    Ok(path)
}
