//! Typed errors for the reel generation pipeline.
//!
//! Every step of [`crate::pipeline::ReelPipeline::generate`] fails fast
//! with exactly one of these variants; nothing is retried inside the
//! pipeline. The HTTP boundary maps each variant to a status code and a
//! short client message while the full detail stays in the server logs.

use thiserror::Error;

/// Errors produced by the generation pipeline and its clients.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The caller supplied bad input (e.g. an empty subject).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The script service errored or returned empty text after trimming.
    #[error("script generation failed: {0}")]
    ScriptGeneration(String),

    /// The speech service returned a non-success response or an empty payload.
    #[error("speech synthesis failed: {0}")]
    SpeechSynthesis(String),

    /// The image lookup succeeded but found nothing for the subject.
    /// Non-fatal to the caller (reported as 404, never retried); the
    /// pipeline never proceeds to render without an image.
    #[error("no image found for subject '{subject}'")]
    ImageNotFound { subject: String },

    /// The image lookup itself failed (transport or malformed response).
    #[error("image lookup failed: {0}")]
    ImageLookup(String),

    /// The remote render service accepted the request but returned no job id.
    #[error("render submission failed: {0}")]
    RenderSubmission(String),

    /// Local assembly or a render status query failed.
    #[error("render failed: {0}")]
    Render(String),

    /// The render service reported the job itself as failed.
    #[error("render job {render_id} reported failure")]
    RenderFailed { render_id: String },

    /// The poller exhausted its attempt budget without a terminal status.
    /// Synthetic failure imposed by the poller, not the render service.
    #[error("render job {render_id} did not complete within {max_attempts} status polls")]
    RenderTimeout { render_id: String, max_attempts: u32 },

    /// Uploading an artifact to durable storage failed.
    #[error("artifact storage failed: {0}")]
    Storage(String),

    /// Inserting the finished reel record failed. Already-uploaded
    /// artifacts are left in storage (accepted orphan, no rollback).
    #[error("failed to persist reel record: {0}")]
    Persistence(String),

    /// A transport-level timeout on any upstream call.
    #[error("upstream call timed out: {0}")]
    UpstreamTimeout(String),

    /// Local filesystem failure while handling a temporary artifact.
    #[error("artifact i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Classify a transport error from `service`: timeouts become
    /// [`PipelineError::UpstreamTimeout`], everything else is wrapped by
    /// the caller-supplied constructor.
    pub fn from_transport(
        service: &str,
        err: reqwest::Error,
        wrap: impl FnOnce(String) -> PipelineError,
    ) -> PipelineError {
        if err.is_timeout() {
            PipelineError::UpstreamTimeout(format!("{service}: {err}"))
        } else {
            wrap(format!("{service}: {err}"))
        }
    }
}
