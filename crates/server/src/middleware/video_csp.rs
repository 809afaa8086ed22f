//! Header finalization for the injected video script.
//!
//! Handlers that inject the script attach a [`ScriptState`] to the response
//! extensions. This middleware takes it back out (so it is used once) and
//! merges the matching `media-src` origin and `script-src` nonce into the
//! response's `Content-Security-Policy`.
//!
//! Must be layered *outside* `security_headers_middleware` so the baseline
//! policy is already on the response when this runs.

use axum::{
    extract::Request,
    http::{HeaderValue, header::CONTENT_SECURITY_POLICY},
    middleware::Next,
    response::Response,
};
use video_header_core::ScriptState;

/// Finalize the CSP header of every response that carries a [`ScriptState`].
pub async fn video_csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let state = response
        .extensions_mut()
        .remove::<ScriptState>()
        .unwrap_or_default();
    finalize_response(&mut response, state);
    response
}

/// Apply `state` to the response's policy.
///
/// Only the first `Content-Security-Policy` value is rewritten; any further
/// values are kept as they are. Browsers enforce every policy, so a later
/// value with its own `script-src` still blocks the script. When the header
/// cannot be read or the result cannot be written, the response keeps its
/// original policy and the script simply stays blocked.
pub fn finalize_response<B>(response: &mut axum::http::Response<B>, state: ScriptState) {
    if !state.is_injected() {
        return;
    }

    let headers = response.headers_mut();
    let policies = headers.get_all(CONTENT_SECURITY_POLICY).iter().count();
    if policies > 1 {
        tracing::debug!(
            policies,
            "Multiple Content-Security-Policy values, only the first gains the script nonce"
        );
    }

    let existing = match headers.get(CONTENT_SECURITY_POLICY).map(HeaderValue::to_str) {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Unreadable Content-Security-Policy, leaving it unchanged");
            return;
        }
    };

    let Some(rendered) = state.finalize(existing) else {
        return;
    };

    let value = match HeaderValue::from_str(&rendered) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Merged Content-Security-Policy is not a valid header value");
            return;
        }
    };

    match headers.get_mut(CONTENT_SECURITY_POLICY) {
        Some(slot) => *slot = value,
        None => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
    }
}
