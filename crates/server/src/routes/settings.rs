//! Control API for per-event video settings.
//!
//! ```text
//! GET    /control/event/{organizer}/{event}/settings/video
//! PUT    /control/event/{organizer}/{event}/settings/video   {"video_url": "https://..."}
//! DELETE /control/event/{organizer}/{event}/settings/video
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use video_header_core::VideoUrl;

use crate::error::{AppError, Result};
use crate::settings::EventKey;
use crate::state::AppState;

/// Request body for updating the video URL.
#[derive(Debug, Deserialize)]
pub struct VideoSettingsForm {
    /// Direct link to a video file the visitor's browser can play.
    pub video_url: String,
}

/// Current video settings of an event.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoSettingsView {
    pub organizer: String,
    pub event: String,
    pub video_url: Option<String>,
    /// Origin that will be allowed in `media-src`.
    pub media_origin: Option<String>,
}

impl VideoSettingsView {
    fn new(key: EventKey, video_url: Option<String>) -> Self {
        let media_origin = video_url
            .as_deref()
            .and_then(|raw| VideoUrl::parse(raw).ok())
            .map(|url| url.origin().to_string());

        Self {
            organizer: key.organizer,
            event: key.event,
            video_url,
            media_origin,
        }
    }
}

/// Show the video settings of an event.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path((organizer, event)): Path<(String, String)>,
) -> Json<VideoSettingsView> {
    let key = EventKey::new(organizer, event);
    let video_url = state.settings().video_url(&key).await;
    Json(VideoSettingsView::new(key, video_url))
}

/// Set the video URL of an event.
///
/// # Errors
///
/// Returns `AppError::InvalidVideoUrl` if the URL fails validation.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path((organizer, event)): Path<(String, String)>,
    Json(form): Json<VideoSettingsForm>,
) -> Result<Json<VideoSettingsView>> {
    let url = VideoUrl::parse(&form.video_url)?;
    let key = EventKey::new(organizer, event);

    state.settings().set_video_url(key.clone(), &url).await;
    tracing::info!(
        organizer = %key.organizer,
        event = %key.event,
        media_origin = %url.origin(),
        "Video URL updated"
    );

    Ok(Json(VideoSettingsView::new(key, Some(url.to_string()))))
}

/// Remove the video URL of an event.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no video was configured.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path((organizer, event)): Path<(String, String)>,
) -> Result<StatusCode> {
    let key = EventKey::new(organizer, event);
    if !state.settings().clear_video_url(&key).await {
        return Err(AppError::NotFound(format!(
            "video settings for {}/{}",
            key.organizer, key.event
        )));
    }

    tracing::info!(organizer = %key.organizer, event = %key.event, "Video URL removed");
    Ok(StatusCode::NO_CONTENT)
}
