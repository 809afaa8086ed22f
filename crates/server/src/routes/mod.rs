//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /{organizer}/{event}/        - Event page (injects the header video script)
//!
//! # Control API (bearer token, only when configured)
//! GET    /control/event/{organizer}/{event}/settings/video
//! PUT    /control/event/{organizer}/{event}/settings/video
//! DELETE /control/event/{organizer}/{event}/settings/video
//! ```

pub mod event;
pub mod settings;

use axum::{Router, middleware, routing::get};

use crate::middleware::require_control_token;
use crate::state::AppState;

/// Create the public page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{organizer}/{event}", get(event::event_page))
        .route("/{organizer}/{event}/", get(event::event_page))
}

/// Create the control API routes, guarded by the control token.
pub fn control_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/control/event/{organizer}/{event}/settings/video",
            get(settings::show)
                .put(settings::update)
                .delete(settings::remove),
        )
        .route_layer(middleware::from_fn_with_state(state, require_control_token))
}
