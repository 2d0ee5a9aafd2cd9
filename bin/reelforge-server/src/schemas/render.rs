//! DTOs for the remote render submit / status endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of `POST /reels/render-submit`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderSubmitRequest {
    pub image_url: String,
    pub audio_url: String,
    /// Reel length in seconds; server default when omitted.
    pub duration: Option<f64>,
}

/// Body of a successful `POST /reels/render-submit`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderSubmitResponse {
    pub render_id: String,
}

/// Query of `GET /reels/render-status`.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RenderStatusQuery {
    pub render_id: String,
}

/// Body of a successful `GET /reels/render-status`.  `status` is the
/// canonical form (`queued` / `rendering` / `done` / `failed`); `url`
/// is present once the render is done.
#[derive(Debug, Serialize, ToSchema)]
pub struct RenderStatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
