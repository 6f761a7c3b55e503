use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::repository::RepoError;

/// AppError
///
/// Request-level failure taxonomy. Every variant renders as a plain-text body;
/// store and crypto details are logged, never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("User already exists")]
    DuplicateUser,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
    #[error("Word not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] RepoError),
    #[error("password hashing failed: {0}")]
    Password(String),
    #[error("session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
    #[error("session lifetime out of range: {0} hours")]
    SessionLifetime(i64),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::DuplicateUser => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_)
            | AppError::Password(_)
            | AppError::Session(_)
            | AppError::SessionLifetime(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            return (status, "Internal server error").into_response();
        }

        (status, self.to_string()).into_response()
    }
}
