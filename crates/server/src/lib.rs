//! Video Header Server library.
//!
//! Serves event pages whose header logo is swapped for a video by an inline
//! script, authorized per response through a CSP nonce. Exposed as a library
//! so the router can be tested in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod settings;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .merge(routes::routes());

    if state.config().control_token.is_some() {
        router = router.merge(routes::control_routes(state.clone()));
    } else {
        tracing::info!("No control token configured, settings control API disabled");
    }

    router
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::video_csp_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
