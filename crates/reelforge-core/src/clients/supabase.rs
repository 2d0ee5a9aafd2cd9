//! Supabase-storage-style artifact store client.
//!
//! Uploads go to `POST {base}/storage/v1/object/{bucket}/{path}` with a
//! bearer key; the public URL is derived from the bucket and path. Each
//! upload gets a fresh UUID object name — identifiers are never reused
//! and no deduplication is attempted.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{error, info};
use uuid::Uuid;

use crate::clients::{ArtifactStore, StoredArtifact};
use crate::error::PipelineError;

/// Configuration for the artifact store.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    pub api_key: String,
    pub bucket: String,
}

/// Artifact store backed by the Supabase storage REST API.
pub struct SupabaseStorage {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseStorage {
    pub fn new(http: reqwest::Client, config: SupabaseConfig) -> Self {
        Self { http, config }
    }
}

/// Pick a file extension for the object name from the content type.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "video/mp4" => "mp4",
        "audio/mpeg" => "mp3",
        "image/jpeg" => "jpg",
        "image/png" => "png",
        _ => "bin",
    }
}

#[async_trait]
impl ArtifactStore for SupabaseStorage {
    async fn store(
        &self,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredArtifact, PipelineError> {
        let id = Uuid::new_v4().to_string();
        let path = format!("{id}.{}", extension_for(content_type));
        let upload_url = format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url, self.config.bucket, path
        );

        let size = bytes.len();
        let resp = self
            .http
            .post(&upload_url)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                PipelineError::from_transport("artifact store", e, PipelineError::Storage)
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            error!(%status, body = %detail, "artifact upload returned non-success");
            return Err(PipelineError::Storage(format!(
                "artifact upload returned {status}"
            )));
        }

        let public_url = format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url, self.config.bucket, path
        );
        info!(%id, bytes = size, content_type, "artifact stored");

        Ok(StoredArtifact {
            id,
            path,
            public_url,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_content_types_map_to_extensions() {
        assert_eq!(extension_for("video/mp4"), "mp4");
        assert_eq!(extension_for("audio/mpeg"), "mp3");
        assert_eq!(extension_for("image/jpeg"), "jpg");
    }

    #[test]
    fn unknown_content_type_falls_back_to_bin() {
        assert_eq!(extension_for("application/x-whatever"), "bin");
    }
}
