//! Per-event video settings.
//!
//! Stands in for the host's settings persistence: an in-memory map from
//! event to configured video URL, optionally seeded from a JSON file of the
//! form
//!
//! ```json
//! [
//!   { "organizer": "acme", "event": "conf2026", "video_url": "https://cdn.example.com/intro.mp4" }
//! ]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use video_header_core::{VideoUrl, VideoUrlError};

/// Errors loading the settings seed file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed settings file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid video URL for {organizer}/{event}: {source}")]
    InvalidVideoUrl {
        organizer: String,
        event: String,
        source: VideoUrlError,
    },
}

/// Identifies an event within an organizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKey {
    pub organizer: String,
    pub event: String,
}

impl EventKey {
    /// Create a key from organizer and event slugs.
    pub fn new(organizer: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            organizer: organizer.into(),
            event: event.into(),
        }
    }
}

/// One entry of the seed file.
#[derive(Debug, Deserialize)]
struct SeedEntry {
    organizer: String,
    event: String,
    video_url: String,
}

/// Shared, cheaply cloneable settings store.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    video_urls: Arc<RwLock<HashMap<EventKey, String>>>,
}

impl SettingsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON seed file.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the file cannot be read or parsed, or if any
    /// entry has an invalid video URL.
    pub async fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let entries: Vec<SeedEntry> =
            serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let mut video_urls = HashMap::with_capacity(entries.len());
        for entry in entries {
            let url = VideoUrl::parse(&entry.video_url).map_err(|source| {
                SettingsError::InvalidVideoUrl {
                    organizer: entry.organizer.clone(),
                    event: entry.event.clone(),
                    source,
                }
            })?;
            video_urls.insert(EventKey::new(entry.organizer, entry.event), url.to_string());
        }

        tracing::info!(events = video_urls.len(), path = %path.display(), "Loaded video settings");
        Ok(Self {
            video_urls: Arc::new(RwLock::new(video_urls)),
        })
    }

    /// The configured video URL for `key`, if any.
    pub async fn video_url(&self, key: &EventKey) -> Option<String> {
        self.video_urls.read().await.get(key).cloned()
    }

    /// Configure the video URL for `key`, replacing any previous value.
    pub async fn set_video_url(&self, key: EventKey, url: &VideoUrl) {
        self.video_urls.write().await.insert(key, url.to_string());
    }

    /// Remove the video URL for `key`. Returns whether one was configured.
    pub async fn clear_video_url(&self, key: &EventKey) -> bool {
        self.video_urls.write().await.remove(key).is_some()
    }
}
