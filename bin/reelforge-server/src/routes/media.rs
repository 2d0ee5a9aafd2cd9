//! Standalone media endpoints: script, speech, image, assemble.
//!
//! These expose the individual pipeline steps so a frontend can run the
//! generation interactively instead of one-shot via `/reels/generate`.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;

use reelforge_core::render::{AudioRef, RenderRequest, VideoRenderer};
use reelforge_core::PipelineError;

use crate::error::ServerError;
use crate::schemas::media::{
    AssembleRequest, AssembleResponse, ImageResponse, ScriptResponse, SpeechRequest,
    SubjectRequest,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(generate_script, synthesize_speech, lookup_image, assemble_video),
    components(schemas(
        SubjectRequest,
        ScriptResponse,
        SpeechRequest,
        ImageResponse,
        AssembleRequest,
        AssembleResponse
    ))
)]
pub struct MediaApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reels/script", post(generate_script))
        .route("/reels/speech", post(synthesize_speech))
        .route("/reels/image", post(lookup_image))
        .route("/reels/assemble", post(assemble_video))
}

fn require_non_empty(value: &str, what: &str) -> Result<(), ServerError> {
    if value.trim().is_empty() {
        return Err(ServerError::BadRequest(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Generate a narration script for one subject.
#[utoipa::path(
    post,
    path = "/reels/script",
    tag = "media",
    request_body = SubjectRequest,
    responses(
        (status = 200, description = "Script generated", body = ScriptResponse),
        (status = 400, description = "Missing or empty subject"),
        (status = 500, description = "Script service error"),
    )
)]
pub async fn generate_script(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubjectRequest>,
) -> Result<Json<ScriptResponse>, ServerError> {
    require_non_empty(&req.subject, "subject")?;
    let script = state.script.generate_script(req.subject.trim()).await?;
    Ok(Json(ScriptResponse { script }))
}

/// Synthesize narration audio for arbitrary text.
///
/// Returns raw `audio/mpeg` bytes with an attachment disposition so
/// browsers download the file instead of navigating to it.
#[utoipa::path(
    post,
    path = "/reels/speech",
    tag = "media",
    request_body = SpeechRequest,
    responses(
        (status = 200, description = "MP3 audio bytes", body = Vec<u8>, content_type = "audio/mpeg"),
        (status = 400, description = "Missing or empty text"),
        (status = 500, description = "Speech service error"),
    )
)]
pub async fn synthesize_speech(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeechRequest>,
) -> Result<impl IntoResponse, ServerError> {
    require_non_empty(&req.text, "text")?;
    let audio = state.speech.synthesize(req.text.trim()).await?;
    info!(bytes = audio.len(), "speech endpoint returning audio");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"speech.mp3\"",
            ),
        ],
        audio,
    ))
}

/// Look up a representative image URL for one subject.
#[utoipa::path(
    post,
    path = "/reels/image",
    tag = "media",
    request_body = SubjectRequest,
    responses(
        (status = 200, description = "Image found", body = ImageResponse),
        (status = 400, description = "Missing or empty subject"),
        (status = 404, description = "No image found for the subject"),
        (status = 500, description = "Image lookup error"),
    )
)]
pub async fn lookup_image(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubjectRequest>,
) -> Result<Json<ImageResponse>, ServerError> {
    require_non_empty(&req.subject, "subject")?;
    let subject = req.subject.trim();
    let image_url = state
        .images
        .resolve_image(subject)
        .await?
        .ok_or(PipelineError::ImageNotFound {
            subject: subject.to_owned(),
        })?;
    Ok(Json(ImageResponse { image_url }))
}

/// Compose a video locally with ffmpeg from an image URL and an audio
/// reference, regardless of the configured render strategy.
///
/// `audioUrl` may be an `http(s)` URL (downloaded to a temp file that
/// is removed afterwards) or a local filesystem path (used as-is and
/// never deleted).
#[utoipa::path(
    post,
    path = "/reels/assemble",
    tag = "media",
    request_body = AssembleRequest,
    responses(
        (status = 200, description = "Video composed and stored", body = AssembleResponse),
        (status = 400, description = "Missing image or audio reference"),
        (status = 500, description = "Assembly error"),
    )
)]
pub async fn assemble_video(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssembleRequest>,
) -> Result<Json<AssembleResponse>, ServerError> {
    require_non_empty(&req.image_url, "imageUrl")?;
    require_non_empty(&req.audio_url, "audioUrl")?;

    let audio_ref = req.audio_url.trim();
    let audio = if audio_ref.starts_with("http://") || audio_ref.starts_with("https://") {
        AudioRef::PublicUrl(audio_ref)
    } else {
        AudioRef::LocalFile(FsPath::new(audio_ref))
    };

    let rendered = state
        .assembler
        .render(RenderRequest {
            image_url: req.image_url.trim(),
            audio,
            duration_secs: req
                .duration
                .unwrap_or(state.config.target_duration_secs),
        })
        .await?;

    Ok(Json(AssembleResponse {
        id: rendered.id,
        video_url: rendered.video_url,
    }))
}
