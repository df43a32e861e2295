use std::sync::Arc;

use axum::{extract::State, Json};

use crate::request_log::RequestRecord;
use crate::state::AppState;

/// Recent requests, newest first
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "admin",
    responses(
        (status = 200, description = "Recent request records", body = [RequestRecord])
    )
)]
pub async fn recent_requests(State(state): State<Arc<AppState>>) -> Json<Vec<RequestRecord>> {
    Json(state.request_log.recent())
}
