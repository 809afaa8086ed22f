//! Event page with the header video script in its footer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;
use video_header_core::{ScriptState, injector};

use crate::settings::EventKey;
use crate::state::AppState;

/// Event page template.
#[derive(Template, WebTemplate)]
#[template(path = "event.html")]
pub struct EventTemplate {
    /// Organizer slug.
    pub organizer: String,
    /// Event slug.
    pub event: String,
    /// Footer fragment from the content-injection hook, already escaped.
    pub footer: Option<String>,
}

/// Display an event page.
///
/// Runs the content-injection hook for the event and hands the resulting
/// [`ScriptState`] to the finalization middleware through the response
/// extensions.
#[instrument(skip(state))]
pub async fn event_page(
    State(state): State<AppState>,
    Path((organizer, event)): Path<(String, String)>,
) -> Response {
    let key = EventKey::new(organizer, event);
    let configured = state.settings().video_url(&key).await;

    let (footer, script_state) = injector::inject(configured.as_deref())
        .map_or((None, ScriptState::NotInjected), |injection| {
            let (fragment, script_state) = injection.into_parts();
            (Some(fragment), script_state)
        });

    let mut response = EventTemplate {
        organizer: key.organizer,
        event: key.event,
        footer,
    }
    .into_response();

    if response.status().is_success() {
        response.extensions_mut().insert(script_state);
    }

    response
}
