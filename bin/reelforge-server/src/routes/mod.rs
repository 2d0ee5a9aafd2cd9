//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with `REEL_ENABLE_SWAGGER=false`)
//! - Health / heartbeat route
//! - Reel CRUD, standalone media, and remote render routes

pub mod doc;
mod health;
mod media;
mod reels;
mod render;

use axum::{middleware, Router};

use crate::middleware::{cors, trace};
use crate::state::AppState;
use std::sync::Arc;
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;

// ── Router builder ────────────────────────────────────────────────────────────

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .merge(health::router())
        .merge(reels::router())
        .merge(media::router())
        .merge(render::router());

    let mut app = Router::new().merge(api_router);

    // ── Swagger UI ────────────────────────────────────────────────────────────
    // Enabled by default; disable with REEL_ENABLE_SWAGGER=false in production
    // to avoid exposing the API structure to potential attackers.
    let api_doc = doc::get_docs();

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(state.clone())))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trace::trace_middleware,
        ))
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Config, RenderStrategy};
    use crate::db::sqlite::SqliteReelStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn test_state() -> Arc<AppState> {
        let config = Config {
            bind_address: "127.0.0.1:0".to_owned(),
            database_url: "sqlite::memory:".to_owned(),
            log_level: "info".to_owned(),
            log_json: false,
            cors_allowed_origins: None,
            enable_swagger: false,
            render_strategy: RenderStrategy::Local,
            target_duration_secs: 15.0,
            render_poll_interval_ms: 10,
            render_poll_max_attempts: 3,
            upstream_timeout_secs: 5,
            cohere_api_key: String::new(),
            cohere_api_url: None,
            elevenlabs_api_key: String::new(),
            elevenlabs_api_url: None,
            elevenlabs_voice_id: None,
            wikipedia_api_url: None,
            shotstack_api_key: String::new(),
            shotstack_api_url: None,
            supabase_url: String::new(),
            supabase_key: String::new(),
            supabase_bucket: "reels".to_owned(),
        };
        let store = SqliteReelStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store");
        AppState::build(config, Arc::new(store)).expect("app state")
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_endpoint_answers_ok() {
        let app = build(test_state().await);
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn reels_list_starts_empty() {
        let app = build(test_state().await);
        let resp = app
            .oneshot(Request::builder().uri("/reels").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["reels"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn render_submit_is_unavailable_under_local_strategy() {
        let app = build(test_state().await);
        let resp = app
            .oneshot(json_post(
                "/reels/render-submit",
                r#"{"imageUrl":"https://i/x.jpg","audioUrl":"https://a/v.mp3"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn generate_with_empty_subject_is_bad_request() {
        let app = build(test_state().await);
        let resp = app
            .oneshot(json_post("/reels/generate", r#"{"subject":"   "}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("subject"));
    }

    #[tokio::test]
    async fn unknown_reel_id_is_not_found() {
        let app = build(test_state().await);
        let resp = app
            .oneshot(Request::builder().uri("/reels/ghost").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
