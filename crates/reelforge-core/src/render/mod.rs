//! Video render strategies.
//!
//! One [`VideoRenderer`] capability, two implementations selected by
//! configuration: local ffmpeg assembly ([`local::FfmpegAssembler`])
//! and remote submit-then-poll rendering ([`shotstack::ShotstackRender`]).
//! The orchestrator never sees which strategy is active; it only asks
//! whether the audio reference must be a public URL.

pub mod local;
pub mod poller;
pub mod shotstack;

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::PipelineError;

/// Canonical status of an asynchronous render job. All vendor-specific
/// status strings (`fetching`, `saving`, …) are normalised to one of
/// these four inside the render client adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    Queued,
    Rendering,
    Done,
    Failed,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::Queued => "queued",
            RenderStatus::Rendering => "rendering",
            RenderStatus::Done => "done",
            RenderStatus::Failed => "failed",
        }
    }
}

/// Canonical view of an in-flight render, as seen by the poller.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub render_id: String,
    pub status: RenderStatus,
    /// Populated only when `status == Done`.
    pub result_url: Option<String>,
}

/// The audio side of a render request. A local file is owned by the
/// caller; renderers must never delete it.
#[derive(Debug, Clone, Copy)]
pub enum AudioRef<'a> {
    PublicUrl(&'a str),
    LocalFile(&'a Path),
}

/// One video composition request: a single image looped over a
/// narration track for `duration_secs`.
#[derive(Debug)]
pub struct RenderRequest<'a> {
    pub image_url: &'a str,
    pub audio: AudioRef<'a>,
    pub duration_secs: f64,
}

/// A finished render: the artifact id (render job id or storage UUID)
/// and the public URL of the composed video.
#[derive(Debug, Clone)]
pub struct RenderedVideo {
    pub id: String,
    pub video_url: String,
}

/// A video composition strategy.
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    /// When `true` the caller must supply [`AudioRef::PublicUrl`]
    /// (i.e. upload the audio to the artifact store first).
    fn requires_public_audio(&self) -> bool;

    /// Compose the video and return its public URL. Blocks (suspends)
    /// until the video is available or a typed error occurs.
    async fn render(&self, request: RenderRequest<'_>) -> Result<RenderedVideo, PipelineError>;
}
