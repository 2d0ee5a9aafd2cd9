//! Drop-guarded temporary artifacts.
//!
//! Every byte payload the pipeline materialises on disk (synthesized
//! audio, downloaded image, composed video) lives in a [`TempArtifact`]
//! owned by the invocation that created it. The backing file is removed
//! when the guard drops, so every exit path of a generation run —
//! success, any typed failure, or an abort — releases its artifacts.
//! Caller-supplied paths are never wrapped and therefore never deleted
//! by code that did not create them.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::PipelineError;

/// An ephemeral local file, deleted on drop.
#[derive(Debug)]
pub struct TempArtifact {
    file: NamedTempFile,
}

impl TempArtifact {
    /// Write `bytes` to a fresh temp file with the given suffix
    /// (e.g. `".mp3"`). The suffix matters: ffmpeg sniffs formats from
    /// file extensions for some demuxers.
    pub fn from_bytes(bytes: &[u8], suffix: &str) -> Result<Self, PipelineError> {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Create an empty temp file for a downstream tool to write into.
    pub fn empty(suffix: &str) -> Result<Self, PipelineError> {
        let file = tempfile::Builder::new().suffix(suffix).tempfile()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
