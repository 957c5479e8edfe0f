//! JSON endpoint used by scripted comment forms

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use super::AppState;
use crate::content::NewComment;

/// `POST /api/createComment` with `{_id, name, email, comment}`
///
/// The body is parsed regardless of content type; browsers posting a JSON
/// string with `fetch` send it as `text/plain`.
pub(crate) async fn create_comment(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let input: NewComment = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": format!("Invalid comment payload: {}", e) })),
            )
                .into_response();
        }
    };

    if input.post_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Missing post id" })),
        )
            .into_response();
    }
    let missing = input.missing_fields();
    if !missing.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "Missing required fields",
                "fields": missing,
            })),
        )
            .into_response();
    }

    match state.store.create_comment(&input).await {
        Ok(created) => {
            tracing::info!("Comment {} submitted for post {}", created.id, input.post_id);
            (StatusCode::OK, Json(created)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create comment for post {}: {}", input.post_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Couldn't submit comment" })),
            )
                .into_response()
        }
    }
}
