//! Application-level error type returned by handlers.
//!
//! Every variant renders as a plain-text body with its HTTP status. Errors
//! are mapped here exactly once; nothing is written to the response before
//! the handler knows whether it succeeded.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pubcast::ProjectionError;

use crate::storage::StorageError;

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::NotFound(msg) => {
                tracing::debug!("not found: {msg}");
                msg
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                msg
            }
            AppError::BadRequest(msg) | AppError::Conflict(msg) => msg,
        };
        (status, message).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Conflict(msg) => AppError::Conflict(msg),
            StorageError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ProjectionError> for AppError {
    fn from(e: ProjectionError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("failed to serialise response: {e}"))
    }
}
