//! Error types for the Todoist task client.
//!
//! # Design
//! Remote rejections keep both the status code and the raw response body.
//! `NotFound` is split out because callers routinely treat a missing task
//! differently from other failures; every other status >= 400 lands in
//! `Http`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A create/update was attempted with empty task content.
    #[error("task content is empty")]
    EmptyContent,

    /// An operation on an existing task was given an empty task id.
    #[error("task id is empty")]
    MissingId,

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced an HTTP response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The server returned a status >= 400 other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Required configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of a remote rejection, if this error is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound(_) => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;
