//! Content store errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request to content store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Content store responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode content store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No project id configured (set sanity.project_id in _config.yml)")]
    MissingProject,

    #[error("No write token configured (set sanity.token or {})", crate::config::TOKEN_ENV)]
    MissingToken,

    #[error("Mutation returned no document id")]
    NoDocumentId,

    #[error("Referenced document {0} does not exist")]
    MissingReference(String),

    #[error("Content store is read-only")]
    ReadOnly,
}

pub type Result<T> = std::result::Result<T, StoreError>;
