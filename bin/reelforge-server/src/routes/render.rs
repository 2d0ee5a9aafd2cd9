//! Remote render submit / status endpoints.
//!
//! Both endpoints require the `remote` render strategy; under the
//! `local` strategy there is no render service to talk to and they
//! answer 503.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use utoipa::OpenApi;

use reelforge_core::render::shotstack::ShotstackRender;

use crate::error::ServerError;
use crate::schemas::render::{
    RenderStatusQuery, RenderStatusResponse, RenderSubmitRequest, RenderSubmitResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(submit_render, render_status),
    components(schemas(
        RenderSubmitRequest,
        RenderSubmitResponse,
        RenderStatusQuery,
        RenderStatusResponse
    ))
)]
pub struct RenderApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reels/render-submit", post(submit_render))
        .route("/reels/render-status", get(render_status))
}

fn remote_renderer(state: &AppState) -> Result<&Arc<ShotstackRender>, ServerError> {
    state.shotstack.as_ref().ok_or_else(|| {
        ServerError::Unavailable(
            "remote rendering is not enabled; set REEL_RENDER_STRATEGY=remote".to_owned(),
        )
    })
}

/// Submit a render job without waiting for it to finish.
#[utoipa::path(
    post,
    path = "/reels/render-submit",
    tag = "render",
    request_body = RenderSubmitRequest,
    responses(
        (status = 200, description = "Render job submitted", body = RenderSubmitResponse),
        (status = 400, description = "Missing image or audio URL"),
        (status = 503, description = "Remote rendering not enabled"),
        (status = 500, description = "Render service error"),
    )
)]
pub async fn submit_render(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderSubmitRequest>,
) -> Result<Json<RenderSubmitResponse>, ServerError> {
    let renderer = remote_renderer(&state)?;
    if req.image_url.trim().is_empty() || req.audio_url.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "imageUrl and audioUrl must not be empty".to_owned(),
        ));
    }

    let render_id = renderer
        .submit(
            req.image_url.trim(),
            req.audio_url.trim(),
            req.duration.unwrap_or(state.config.target_duration_secs),
        )
        .await?;
    Ok(Json(RenderSubmitResponse { render_id }))
}

/// Query one render job's status in canonical form.
#[utoipa::path(
    get,
    path = "/reels/render-status",
    tag = "render",
    params(RenderStatusQuery),
    responses(
        (status = 200, description = "Render status", body = RenderStatusResponse),
        (status = 400, description = "Missing renderId"),
        (status = 503, description = "Remote rendering not enabled"),
        (status = 500, description = "Render service error"),
    )
)]
pub async fn render_status(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RenderStatusQuery>,
) -> Result<Json<RenderStatusResponse>, ServerError> {
    let renderer = remote_renderer(&state)?;
    if q.render_id.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "renderId must not be empty".to_owned(),
        ));
    }

    let job = renderer.status(q.render_id.trim()).await?;
    Ok(Json(RenderStatusResponse {
        status: job.status.as_str().to_owned(),
        url: job.result_url,
    }))
}
