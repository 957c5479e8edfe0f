//! HTML page handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Form,
};
use std::sync::Arc;

use super::error::AppError;
use super::AppState;
use crate::comments::{CommentForm, CommentInput};

/// `GET /` - every post as a card
pub(crate) async fn index(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let posts = state.store.fetch_posts().await?;
    tracing::debug!("Rendering index with {} post(s)", posts.len());
    let html = state.renderer.render_index(&state.config, &posts)?;
    Ok(([(header::CACHE_CONTROL, "no-store")], Html(html)).into_response())
}

/// `GET /post/:slug` - one post with its approved comments
pub(crate) async fn post_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    uri: Uri,
) -> Result<Response, AppError> {
    let post = match state.store.fetch_post(&slug).await? {
        Some(post) => post,
        None => return Ok(not_found(&state, uri.path())),
    };

    let form = CommentForm::new(post.id.clone());
    let html = state.renderer.render_post(&state.config, &post, &form)?;
    Ok(([(header::CACHE_CONTROL, state.cache_control())], Html(html)).into_response())
}

/// `POST /post/:slug/comment` - the comment form without JavaScript
pub(crate) async fn submit_comment(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    uri: Uri,
    Form(input): Form<CommentInput>,
) -> Result<Response, AppError> {
    let post = match state.store.fetch_post(&slug).await? {
        Some(post) => post,
        None => return Ok(not_found(&state, uri.path())),
    };

    let mut form = CommentForm::with_input(post.id.clone(), input);
    form.submit(state.store.as_ref()).await;

    let html = state.renderer.render_post(&state.config, &post, &form)?;
    Ok(([(header::CACHE_CONTROL, "no-store")], Html(html)).into_response())
}

/// Any other route
pub(crate) async fn fallback(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    not_found(&state, uri.path())
}

fn not_found(state: &AppState, path: &str) -> Response {
    tracing::debug!("Not found: {}", path);
    match state.renderer.render_not_found(path) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render not-found page: {}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
