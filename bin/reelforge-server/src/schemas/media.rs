//! DTOs for the standalone script / speech / image / assemble endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /reels/script` and `POST /reels/image`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubjectRequest {
    #[serde(alias = "celebrity")]
    pub subject: String,
}

/// Body of a successful `POST /reels/script`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScriptResponse {
    pub script: String,
}

/// Body of `POST /reels/speech`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SpeechRequest {
    pub text: String,
}

/// Body of a successful `POST /reels/image`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}

/// Body of `POST /reels/assemble`: compose a video locally from a
/// remote image and an audio reference.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssembleRequest {
    pub image_url: String,
    pub audio_url: String,
    /// Reel length in seconds; server default when omitted.
    pub duration: Option<f64>,
}

/// Body of a successful `POST /reels/assemble`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssembleResponse {
    pub id: String,
    pub video_url: String,
}
