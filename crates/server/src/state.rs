//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::settings::SettingsStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds nothing request-specific: the
/// per-response script state travels with the response itself.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    settings: SettingsStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, settings: SettingsStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, settings }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the per-event settings store.
    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }
}
