//! Reel CRUD endpoints: generate, list, get, delete.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::reels::{
    DeleteReelResponse, GenerateReelRequest, ReelListResponse, ReelResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(generate_reel, list_reels, get_reel, delete_reel),
    components(schemas(GenerateReelRequest, ReelResponse, ReelListResponse, DeleteReelResponse))
)]
pub struct ReelsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reels/generate", post(generate_reel))
        .route("/reels", get(list_reels))
        .route("/reels/{id}", get(get_reel))
        .route("/reels/{id}", delete(delete_reel))
}

/// Run the full generation pipeline for one subject and persist the result.
///
/// This call blocks until the reel is rendered and stored; with remote
/// rendering that can take minutes.
#[utoipa::path(
    post,
    path = "/reels/generate",
    tag = "reels",
    request_body = GenerateReelRequest,
    responses(
        (status = 201, description = "Reel generated and stored", body = ReelResponse),
        (status = 400, description = "Missing or empty subject"),
        (status = 404, description = "No image found for the subject"),
        (status = 500, description = "Generation failed"),
    )
)]
pub async fn generate_reel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateReelRequest>,
) -> Result<(StatusCode, Json<ReelResponse>), ServerError> {
    let reel = state.pipeline.generate(&req.subject).await?;
    Ok((StatusCode::CREATED, Json(reel.into())))
}

/// List all reels, newest first.
#[utoipa::path(
    get,
    path = "/reels",
    tag = "reels",
    responses(
        (status = 200, description = "Reels listed", body = ReelListResponse),
        (status = 500, description = "Store error"),
    )
)]
pub async fn list_reels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReelListResponse>, ServerError> {
    let reels = state
        .store
        .list()
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(Json(ReelListResponse {
        reels: reels.into_iter().map(ReelResponse::from).collect(),
    }))
}

/// Fetch one reel by id.
#[utoipa::path(
    get,
    path = "/reels/{id}",
    tag = "reels",
    params(
        ("id" = String, Path, description = "ID of the reel to retrieve")
    ),
    responses(
        (status = 200, description = "Reel retrieved", body = ReelResponse),
        (status = 404, description = "Reel not found"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn get_reel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ReelResponse>, ServerError> {
    let reel = state
        .store
        .get(&id)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .ok_or_else(|| ServerError::NotFound(format!("reel {id} not found")))?;
    Ok(Json(reel.into()))
}

/// Delete one reel record.  The stored video and thumbnail artifacts are
/// left in place.
#[utoipa::path(
    delete,
    path = "/reels/{id}",
    tag = "reels",
    params(
        ("id" = String, Path, description = "ID of the reel to delete")
    ),
    responses(
        (status = 200, description = "Reel deleted", body = DeleteReelResponse),
        (status = 404, description = "Reel not found"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn delete_reel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteReelResponse>, ServerError> {
    let deleted = state
        .store
        .delete(&id)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    if !deleted {
        return Err(ServerError::NotFound(format!("reel {id} not found")));
    }
    info!(reel_id = %id, "reel deleted");
    Ok(Json(DeleteReelResponse {
        message: format!("reel {id} deleted"),
    }))
}
