use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::request_log;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api/upload/images", post(handlers::upload::upload_images))
        .route(
            "/api/upload/images/{filename}",
            delete(handlers::delete::delete_image),
        )
        .route("/api/logs", get(handlers::logs::recent_requests))
        .route("/api/openapi.json", get(openapi_json));

    // Stored files are served from the same prefix the response URLs carry.
    // An absolute base URL means something external (a CDN) serves them and
    // nothing is mounted here.
    let public_base = state.config.public_base_url.trim_end_matches('/').to_string();
    if public_base.starts_with('/') {
        router = router.nest_service(
            &public_base,
            ServeDir::new(state.store.base_path().to_path_buf()),
        );
    }

    router
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            request_log::track,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(state.config.max_request_body_bytes()))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}
