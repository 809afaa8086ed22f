//! Unified error handling for route handlers.
//!
//! Route handlers return `Result<T, AppError>`. Every variant is a client
//! error, so its message is safe to return as the response body.
//!
//! Nothing in the video script path produces an `AppError`: a missing or bad
//! configuration only means the response goes out without the script.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use video_header_core::VideoUrlError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// The submitted video URL failed validation.
    #[error("Invalid video URL: {0}")]
    InvalidVideoUrl(#[from] VideoUrlError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or wrong control token.
    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidVideoUrl(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        (status, self.to_string()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
