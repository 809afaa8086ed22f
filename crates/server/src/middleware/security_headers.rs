//! Security headers middleware.
//!
//! Every response starts locked down. The baseline `Content-Security-Policy`
//! comes from configuration; the video script is authorized afterwards, per
//! response, by `video_csp_middleware`.

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: no-referrer` - Zero referrer leakage
/// - `Content-Security-Policy` - The configured baseline, unless the handler
///   already set a policy of its own
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    if !headers.contains_key(CONTENT_SECURITY_POLICY) {
        match HeaderValue::from_str(&state.config().base_policy) {
            Ok(value) => {
                headers.insert(CONTENT_SECURITY_POLICY, value);
            }
            Err(e) => {
                tracing::error!(error = %e, "Configured base Content-Security-Policy is not a valid header value");
            }
        }
    }

    response
}
