//! Integration tests for the video header server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p video-header-integration-tests
//! ```
//!
//! Tests build the full router in-process and drive it with
//! `tower::ServiceExt::oneshot`; no network or external services are needed.
//!
//! # Test Categories
//!
//! - `video_header` - Script injection and CSP finalization end to end
//! - `settings_api` - Control API for per-event video settings

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header::CONTENT_SECURITY_POLICY};
use secrecy::SecretString;
use tower::ServiceExt;
use video_header_core::VideoUrl;
use video_header_server::config::ServerConfig;
use video_header_server::settings::{EventKey, SettingsStore};
use video_header_server::state::AppState;

/// Control token used by test routers.
pub const CONTROL_TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// A router plus direct access to its settings store.
pub struct TestApp {
    pub router: Router,
    pub settings: SettingsStore,
}

impl TestApp {
    /// Build an app with the default config and the control API enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ServerConfig {
            control_token: Some(SecretString::from(CONTROL_TOKEN)),
            ..ServerConfig::default()
        })
    }

    /// Build an app with a custom config.
    #[must_use]
    pub fn with_config(config: ServerConfig) -> Self {
        let settings = SettingsStore::new();
        let router = video_header_server::app(AppState::new(config, settings.clone()));
        Self { router, settings }
    }

    /// Configure a video URL for an event directly in the store.
    ///
    /// # Panics
    ///
    /// Panics if `url` is not a valid video URL.
    #[allow(clippy::unwrap_used)]
    pub async fn configure(&self, organizer: &str, event: &str, url: &str) {
        self.settings
            .set_video_url(EventKey::new(organizer, event), &VideoUrl::parse(url).unwrap())
            .await;
    }

    /// Send a request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails, which it never does for valid requests.
    #[allow(clippy::unwrap_used)]
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// `GET` a path.
    ///
    /// # Panics
    ///
    /// Panics if the path is not a valid URI.
    #[allow(clippy::unwrap_used)]
    pub async fn get(&self, path: &str) -> Response<Body> {
        self.send(Request::get(path).body(Body::empty()).unwrap()).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a response body as UTF-8.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
#[allow(clippy::unwrap_used)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The response's first `Content-Security-Policy` value.
#[must_use]
pub fn csp(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(CONTENT_SECURITY_POLICY)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// The value of the first `nonce="..."` attribute in `html`.
#[must_use]
pub fn script_nonce(html: &str) -> Option<&str> {
    let start = html.find("nonce=\"")? + "nonce=\"".len();
    let rest = html.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end)
}

/// The value of the `'nonce-...'` source in `policy`'s `script-src`.
#[must_use]
pub fn policy_nonce(policy: &str) -> Option<String> {
    let parsed = video_header_core::csp::Policy::parse(policy);
    parsed
        .sources(video_header_core::csp::SCRIPT_SRC)?
        .iter()
        .find_map(|s| s.strip_prefix("'nonce-")?.strip_suffix('\'').map(str::to_owned))
}
