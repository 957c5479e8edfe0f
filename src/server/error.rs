//! Errors raised while serving a request

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Content store error: {0}")]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Render(#[from] tera::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        let status = match self {
            AppError::Store(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Html(format!(
                "<h1>{}</h1><p>Something went wrong. Please try again later.</p>",
                status
            )),
        )
            .into_response()
    }
}
