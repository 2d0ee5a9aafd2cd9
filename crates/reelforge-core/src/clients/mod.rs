//! Upstream service clients.
//!
//! Each external collaborator is a trait plus one reqwest-backed
//! implementation. Base URLs and credentials are injected through the
//! per-client config structs — never hard-coded — so tests can point a
//! client at a local mock server. Third-party response shapes are
//! normalised inside each client and never leak into the pipeline.

pub mod cohere;
pub mod elevenlabs;
pub mod supabase;
pub mod wikimedia;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::PipelineError;

/// Result of one artifact-store upload. `id` is globally unique per
/// call (fresh UUID, no deduplication).
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub id: String,
    /// Object path inside the bucket, e.g. `"<uuid>.mp4"`.
    pub path: String,
    /// Stable public URL of the stored object.
    pub public_url: String,
}

/// Text generation given a subject.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    async fn generate_script(&self, subject: &str) -> Result<String, PipelineError>;
}

/// Audio synthesis given text.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Bytes, PipelineError>;
}

/// Image URL lookup given a subject. `Ok(None)` means the lookup worked
/// but found nothing; the pipeline turns that into
/// [`PipelineError::ImageNotFound`].
#[async_trait]
pub trait ImageResolver: Send + Sync {
    async fn resolve_image(&self, subject: &str) -> Result<Option<String>, PipelineError>;
}

/// Durable byte storage returning a public URL per upload.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn store(
        &self,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredArtifact, PipelineError>;
}
