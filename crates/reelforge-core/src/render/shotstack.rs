//! Shotstack-style remote render client.
//!
//! Submits a single-image-plus-audio edit and polls the render status
//! endpoint until the video URL is available. Historical revisions of
//! the upstream API disagree on response nesting (`id` vs
//! `response.id`, `status` vs `response.status`); all of that variance
//! is normalised here, behind the canonical [`RenderJob`] shape.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::PipelineError;
use crate::render::poller::{self, RenderStatusSource};
use crate::render::{
    AudioRef, RenderJob, RenderRequest, RenderStatus, RenderedVideo, VideoRenderer,
};

/// Configuration for the remote render service.
#[derive(Debug, Clone)]
pub struct ShotstackConfig {
    /// API base, default `https://api.shotstack.io/v1`.
    pub api_url: String,
    pub api_key: String,
}

impl ShotstackConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: "https://api.shotstack.io/v1".to_owned(),
            api_key: api_key.into(),
        }
    }
}

/// Remote renderer: submit, then poll.
pub struct ShotstackRender {
    http: reqwest::Client,
    config: ShotstackConfig,
    poll_interval: Duration,
    poll_max_attempts: u32,
}

impl ShotstackRender {
    pub fn new(
        http: reqwest::Client,
        config: ShotstackConfig,
        poll_interval: Duration,
        poll_max_attempts: u32,
    ) -> Self {
        Self {
            http,
            config,
            poll_interval,
            poll_max_attempts,
        }
    }

    /// Build the edit payload: one zoom-in image clip looped for the
    /// whole duration over a single audio track, mp4/sd output.
    fn edit_payload(image_url: &str, audio_url: &str, duration_secs: f64) -> Value {
        json!({
            "timeline": {
                "background": "#000000",
                "tracks": [
                    {
                        "clips": [{
                            "asset": { "type": "image", "src": image_url },
                            "start": 0,
                            "length": duration_secs,
                            "transition": { "in": "fade", "out": "fade" },
                            "effect": "zoomIn",
                        }],
                    },
                    {
                        "clips": [{
                            "asset": { "type": "audio", "src": audio_url },
                            "start": 0,
                            "length": duration_secs,
                        }],
                    },
                ],
            },
            "output": { "format": "mp4", "resolution": "sd" },
        })
    }

    /// Submit an edit; returns the render job id.
    pub async fn submit(
        &self,
        image_url: &str,
        audio_url: &str,
        duration_secs: f64,
    ) -> Result<String, PipelineError> {
        let url = format!("{}/render", self.config.api_url);
        let payload = Self::edit_payload(image_url, audio_url, duration_secs);

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                PipelineError::from_transport("render service", e, PipelineError::RenderSubmission)
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            error!(%status, body = %detail, "render submission returned non-success");
            return Err(PipelineError::RenderSubmission(format!(
                "render service returned {status}"
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            PipelineError::RenderSubmission(format!("invalid render service response: {e}"))
        })?;

        let render_id = extract_render_id(&body).ok_or_else(|| {
            error!(body = %body, "render submission response carried no job id");
            PipelineError::RenderSubmission("render service returned no job id".to_owned())
        })?;

        info!(%render_id, "render job submitted");
        Ok(render_id)
    }

    /// Query one render's status, normalised to [`RenderJob`].
    pub async fn status(&self, render_id: &str) -> Result<RenderJob, PipelineError> {
        let url = format!("{}/render/{render_id}", self.config.api_url);

        let resp = self
            .http
            .get(&url)
            .header("x-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| PipelineError::from_transport("render service", e, PipelineError::Render))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(PipelineError::Render(format!(
                "render status query returned {status}"
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            PipelineError::Render(format!("invalid render status response: {e}"))
        })?;

        Ok(normalize_status(render_id, &body))
    }
}

/// `data.id`, `data.response.id`, or top-level `id` — take the first
/// one present.
fn extract_render_id(body: &Value) -> Option<String> {
    [
        &body["response"]["id"],
        &body["data"]["response"]["id"],
        &body["data"]["id"],
        &body["id"],
    ]
    .into_iter()
    .find_map(|v| v.as_str())
    .map(str::to_owned)
}

/// Map a raw status response onto the canonical [`RenderJob`] shape.
/// Intermediate vendor states (`fetching`, `saving`) count as
/// `rendering`; unknown strings are treated as still in progress.
fn normalize_status(render_id: &str, body: &Value) -> RenderJob {
    let nested = &body["response"];
    let raw_status = nested["status"]
        .as_str()
        .or_else(|| body["status"].as_str())
        .unwrap_or("");
    let result_url = nested["url"]
        .as_str()
        .or_else(|| body["url"].as_str())
        .map(str::to_owned);

    let status = match raw_status {
        "queued" => RenderStatus::Queued,
        "fetching" | "rendering" | "saving" => RenderStatus::Rendering,
        "done" => RenderStatus::Done,
        "failed" => RenderStatus::Failed,
        other => {
            warn!(render_id, raw = other, "unknown render status; treating as in progress");
            RenderStatus::Rendering
        }
    };

    RenderJob {
        render_id: render_id.to_owned(),
        status,
        result_url,
    }
}

#[async_trait]
impl RenderStatusSource for ShotstackRender {
    async fn render_status(&self, render_id: &str) -> Result<RenderJob, PipelineError> {
        self.status(render_id).await
    }
}

#[async_trait]
impl VideoRenderer for ShotstackRender {
    fn requires_public_audio(&self) -> bool {
        true
    }

    async fn render(&self, request: RenderRequest<'_>) -> Result<RenderedVideo, PipelineError> {
        let audio_url = match request.audio {
            AudioRef::PublicUrl(url) => url,
            AudioRef::LocalFile(_) => {
                return Err(PipelineError::RenderSubmission(
                    "remote render requires a public audio URL".to_owned(),
                ));
            }
        };

        let render_id = self
            .submit(request.image_url, audio_url, request.duration_secs)
            .await?;
        let video_url = poller::await_render(
            self,
            &render_id,
            self.poll_max_attempts,
            self.poll_interval,
        )
        .await?;

        Ok(RenderedVideo {
            id: render_id,
            video_url,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
