//! Temporary-file lifecycle.
//!
//! [`PreparedAudio`] owns the local files produced for one invocation and
//! unlinks them when dropped. Holding it across the whole
//! acquire→transcode→submit→generate sequence guarantees cleanup on every
//! exit path without manual calls scattered across branches.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Allocate a unique scratch path in the system temp directory.
///
/// UUIDv7 names are time-ordered and collision-free under concurrent
/// invocations.
pub fn scratch_path(extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!("murmur-{}.{extension}", Uuid::now_v7()))
}

/// A local audio file ready for submission, plus the source it came from.
///
/// `path` and `source_path` are equal when no transcoding was performed.
/// Dropping the value removes both files (best-effort; a missing file or an
/// OS-level deletion error is ignored — response correctness does not depend
/// on cleanup, only resource hygiene does).
#[derive(Debug)]
pub struct PreparedAudio {
    path: PathBuf,
    media_type: String,
    source_path: PathBuf,
    requires_cleanup: bool,
}

impl PreparedAudio {
    /// Wrap a freshly acquired file (no transcoding yet).
    pub fn new(path: PathBuf, media_type: impl Into<String>) -> Self {
        Self {
            source_path: path.clone(),
            path,
            media_type: media_type.into(),
            requires_cleanup: true,
        }
    }

    /// Replace the output file after transcoding, keeping the original as the
    /// tracked source.
    #[must_use]
    pub fn with_output(mut self, path: PathBuf, media_type: impl Into<String>) -> Self {
        self.path = path;
        self.media_type = media_type.into();
        self
    }

    /// Path of the file to submit.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical media type of the file at [`path`](Self::path).
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Path of the originally acquired file (may equal [`path`](Self::path)).
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

impl Drop for PreparedAudio {
    fn drop(&mut self) {
        if !self.requires_cleanup {
            return;
        }
        let _ = std::fs::remove_file(&self.path);
        if self.source_path != self.path {
            let _ = std::fs::remove_file(&self.source_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn scratch_paths_are_unique() {
        let a = scratch_path("ogg");
        let b = scratch_path("ogg");
        assert_ne!(a, b);
        assert!(a.to_string_lossy().ends_with(".ogg"));
    }

    #[test]
    fn drop_removes_single_file() {
        let path = scratch_path("wav");
        touch(&path);
        {
            let _prepared = PreparedAudio::new(path.clone(), "audio/wav");
        }
        assert!(!path.exists());
    }

    #[test]
    fn drop_removes_output_and_distinct_source() {
        let source = scratch_path("webm");
        let output = scratch_path("ogg");
        touch(&source);
        touch(&output);
        {
            let prepared = PreparedAudio::new(source.clone(), "audio/webm");
            let _prepared = prepared.with_output(output.clone(), "audio/ogg");
        }
        assert!(!source.exists());
        assert!(!output.exists());
    }

    #[test]
    fn with_output_does_not_delete_early() {
        let source = scratch_path("webm");
        let output = scratch_path("ogg");
        touch(&source);
        touch(&output);
        let prepared = PreparedAudio::new(source.clone(), "audio/webm");
        let prepared = prepared.with_output(output.clone(), "audio/ogg");
        // Both files still present while the guard is alive.
        assert!(source.exists());
        assert!(output.exists());
        drop(prepared);
        assert!(!source.exists());
        assert!(!output.exists());
    }

    #[test]
    fn drop_on_missing_file_is_silent() {
        let path = scratch_path("wav");
        // Never created — drop must not panic.
        let _prepared = PreparedAudio::new(path, "audio/wav");
    }
}
