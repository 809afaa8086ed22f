//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors, binary only)
//! 2. `TraceLayer` (request tracing)
//! 3. Video CSP finalization (merge nonce and media origin into the policy)
//! 4. Security headers (baseline CSP, framing, sniffing, referrer)
//!
//! The control API additionally sits behind the bearer token guard.

pub mod control_auth;
pub mod security_headers;
pub mod video_csp;

pub use control_auth::require_control_token;
pub use security_headers::security_headers_middleware;
pub use video_csp::{finalize_response, video_csp_middleware};
