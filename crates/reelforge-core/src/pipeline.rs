//! The reel generation orchestrator.
//!
//! Drives one subject name to one persisted [`Reel`] record, or fails
//! cleanly with a single typed error and no partial state. Steps run in
//! strict sequence — script, audio, audio reference, image, render,
//! persist — one external call at a time. Nothing here retries; retry
//! policy belongs to the caller.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::artifact::TempArtifact;
use crate::clients::{
    ArtifactStore, ImageResolver, ScriptGenerator, SpeechSynthesizer, StoredArtifact,
};
use crate::error::PipelineError;
use crate::render::{AudioRef, RenderRequest, VideoRenderer};
use crate::store::ReelStore;
use crate::types::Reel;

/// The audio reference for this run. Either an uploaded artifact
/// (remote render needs a public URL) or a pipeline-owned temp file
/// that is released when the run returns.
enum AudioHandle {
    Uploaded(StoredArtifact),
    Local(TempArtifact),
}

/// Sequences the upstream clients into one end-to-end generation.
pub struct ReelPipeline {
    script: Arc<dyn ScriptGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    images: Arc<dyn ImageResolver>,
    renderer: Arc<dyn VideoRenderer>,
    artifacts: Arc<dyn ArtifactStore>,
    store: Arc<dyn ReelStore>,
    target_duration_secs: f64,
}

impl ReelPipeline {
    pub fn new(
        script: Arc<dyn ScriptGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
        images: Arc<dyn ImageResolver>,
        renderer: Arc<dyn VideoRenderer>,
        artifacts: Arc<dyn ArtifactStore>,
        store: Arc<dyn ReelStore>,
        target_duration_secs: f64,
    ) -> Self {
        Self {
            script,
            speech,
            images,
            renderer,
            artifacts,
            store,
            target_duration_secs,
        }
    }

    /// Generate and persist one reel for `subject`.
    ///
    /// Every failure surfaces as exactly one [`PipelineError`] variant;
    /// temp artifacts created here are released on all paths. A
    /// persistence failure after a successful render leaves the
    /// uploaded artifacts in storage — reported, not rolled back.
    pub async fn generate(&self, subject: &str) -> Result<Reel, PipelineError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(PipelineError::InvalidInput(
                "subject must not be empty".to_owned(),
            ));
        }
        info!(subject, "reel generation started");

        // 1. Script text. Empty-after-trim counts as failure.
        let script = self.script.generate_script(subject).await?;
        let script = script.trim().to_owned();
        if script.is_empty() {
            return Err(PipelineError::ScriptGeneration(
                "script service returned empty text".to_owned(),
            ));
        }

        // 2. Narration audio.
        let audio = self.speech.synthesize(&script).await?;
        if audio.is_empty() {
            return Err(PipelineError::SpeechSynthesis(
                "speech service returned an empty payload".to_owned(),
            ));
        }

        // 3. Addressable audio reference, per render strategy.
        let audio_handle = if self.renderer.requires_public_audio() {
            AudioHandle::Uploaded(self.artifacts.store(audio, "audio/mpeg").await?)
        } else {
            AudioHandle::Local(TempArtifact::from_bytes(&audio, ".mp3")?)
        };

        // 4. Representative image. Never render without one.
        let thumbnail_url = self
            .images
            .resolve_image(subject)
            .await?
            .ok_or_else(|| PipelineError::ImageNotFound {
                subject: subject.to_owned(),
            })?;
        debug!(subject, thumbnail = %thumbnail_url, "image resolved");

        // 5. Compose the video.
        let audio_ref = match &audio_handle {
            AudioHandle::Uploaded(artifact) => AudioRef::PublicUrl(&artifact.public_url),
            AudioHandle::Local(temp) => AudioRef::LocalFile(temp.path()),
        };
        let rendered = self
            .renderer
            .render(RenderRequest {
                image_url: &thumbnail_url,
                audio: audio_ref,
                duration_secs: self.target_duration_secs,
            })
            .await?;

        // 6. Persist the finished record. Storage artifacts are not
        //    rolled back if this fails.
        let reel = Reel {
            id: rendered.id,
            title: Reel::title_for(subject),
            subject: subject.to_owned(),
            video_url: rendered.video_url,
            thumbnail_url,
            script,
            created_at: Utc::now(),
        };
        if let Err(e) = self.store.insert(&reel).await {
            warn!(reel_id = %reel.id, video_url = %reel.video_url,
                  "reel insert failed; uploaded artifacts orphaned");
            return Err(PipelineError::Persistence(e.to_string()));
        }

        info!(reel_id = %reel.id, subject, "reel generation finished");
        Ok(reel)
    }
}
