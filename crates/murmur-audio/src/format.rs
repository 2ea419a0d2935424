//! Media type classification.
//!
//! Resolves a declared content type and/or file name into the canonical
//! media type used internally, and answers whether that type is natively
//! accepted by the remote transcription capability (anything else must be
//! transcoded first).

/// Sentinel type returned when neither content type nor extension is known.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Formats the Gemini API accepts without prior conversion.
const NATIVE_TYPES: &[&str] = &[
    "audio/wav",
    "audio/mpeg",
    "audio/aiff",
    "audio/aac",
    "audio/ogg",
    "audio/flac",
];

/// Content-type synonym table: spellings seen in the wild → canonical form.
const CONTENT_TYPE_SYNONYMS: &[(&str, &str)] = &[
    ("audio/wav", "audio/wav"),
    ("audio/x-wav", "audio/wav"),
    ("audio/wave", "audio/wav"),
    ("audio/vnd.wave", "audio/wav"),
    ("audio/mpeg", "audio/mpeg"),
    ("audio/mp3", "audio/mpeg"),
    ("audio/mpeg3", "audio/mpeg"),
    ("audio/aiff", "audio/aiff"),
    ("audio/x-aiff", "audio/aiff"),
    ("audio/aac", "audio/aac"),
    ("audio/x-aac", "audio/aac"),
    ("audio/ogg", "audio/ogg"),
    ("application/ogg", "audio/ogg"),
    ("audio/flac", "audio/flac"),
    ("audio/x-flac", "audio/flac"),
    ("audio/opus", "audio/opus"),
    ("audio/webm", "audio/webm"),
    ("video/webm", "audio/webm"),
    ("audio/mp4", "audio/mp4"),
    ("audio/x-m4a", "audio/mp4"),
    ("audio/m4a", "audio/mp4"),
    ("audio/x-ms-wma", "audio/x-ms-wma"),
];

/// File-extension table (lowercase, no dot) → canonical media type.
const EXTENSION_TYPES: &[(&str, &str)] = &[
    ("wav", "audio/wav"),
    ("mp3", "audio/mpeg"),
    ("aiff", "audio/aiff"),
    ("aif", "audio/aiff"),
    ("aac", "audio/aac"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("flac", "audio/flac"),
    ("opus", "audio/opus"),
    ("webm", "audio/webm"),
    ("m4a", "audio/mp4"),
    ("mp4", "audio/mp4"),
    ("wma", "audio/x-ms-wma"),
];

/// Resolve the canonical media type for a recording.
///
/// Resolution order: known content-type synonym first, then file-name
/// extension, then [`UNKNOWN_MEDIA_TYPE`]. Content-type parameters
/// (`; codecs=...`) are ignored.
pub fn classify(declared_name: Option<&str>, content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        let bare = ct.split(';').next().unwrap_or(ct).trim().to_lowercase();
        if let Some((_, canonical)) = CONTENT_TYPE_SYNONYMS.iter().find(|(s, _)| *s == bare) {
            return (*canonical).to_string();
        }
    }

    if let Some(name) = declared_name {
        let lower = name.to_lowercase();
        if let Some(ext) = lower.rsplit('.').next().filter(|e| *e != lower) {
            if let Some((_, canonical)) = EXTENSION_TYPES.iter().find(|(e, _)| *e == ext) {
                return (*canonical).to_string();
            }
        }
    }

    UNKNOWN_MEDIA_TYPE.to_string()
}

/// Whether the remote capability accepts this media type without conversion.
///
/// Unknown types are never native, which forces transcoding — the safe
/// default.
pub fn is_native(media_type: &str) -> bool {
    NATIVE_TYPES.contains(&media_type)
}
