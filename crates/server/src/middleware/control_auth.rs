//! Bearer token guard for the settings control API.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::state::AppState;

/// Reject requests that do not carry `Authorization: Bearer <control token>`.
///
/// With no token configured every request is rejected.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` on a missing or wrong token.
pub async fn require_control_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config().control_token.as_ref() else {
        return Err(AppError::Unauthorized);
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .unwrap_or_default();

    if !constant_time_eq(presented.as_bytes(), expected.expose_secret().as_bytes()) {
        tracing::warn!(path = %request.uri().path(), "Rejected control API request");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Compare two byte strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
