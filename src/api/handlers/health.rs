/*
 * Responsibility
 * - GET /health (疎通用)
 * - 認証 middleware の外側に置く
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "store": state.notes.backend_name()})),
    )
}
