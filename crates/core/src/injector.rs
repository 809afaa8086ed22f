//! Nonce-scoped injection of the header video script.
//!
//! A response moves through two hooks, in this order:
//!
//! 1. **Content injection** ([`inject`]): if a usable video URL is configured,
//!    a fresh [`Nonce`] is generated and a `<script nonce="...">` fragment is
//!    produced together with the [`ScriptState::Injected`] context that
//!    authorizes exactly that script.
//! 2. **Header finalization** ([`ScriptState::finalize`]): the context is
//!    consumed, and the response's policy gains `media-src <origin>` and
//!    `script-src 'nonce-<value>'`.
//!
//! The context is a plain value. The host carries it from the first hook to
//! the second for one response only; nothing is stored process-wide.
//!
//! ```
//! use video_header_core::injector::{self, ScriptState};
//!
//! let (fragment, state) = injector::inject(Some("https://cdn.example.com/intro.mp4"))
//!     .map(injector::Injection::into_parts)
//!     .unwrap();
//! assert!(fragment.starts_with("<script nonce=\""));
//!
//! let header = state.finalize(Some("default-src 'self'")).unwrap();
//! assert!(header.starts_with("default-src 'self'; media-src https://cdn.example.com; script-src 'nonce-"));
//!
//! // Nothing configured: no script, header untouched.
//! assert!(injector::inject(None).is_none());
//! assert_eq!(ScriptState::NotInjected.finalize(Some("default-src 'self'")), None);
//! ```

use crate::csp::{Additions, MEDIA_SRC, Policy, SCRIPT_SRC};
use crate::nonce::Nonce;
use crate::types::{MediaOrigin, VideoUrl};

/// Placeholder replaced by the JSON-encoded video URL.
const VIDEO_URL_PLACEHOLDER: &str = "__VIDEO_URL__";

/// Swaps the large header logo for a muted, looping, autoplaying video.
/// Does nothing when the page has no such logo.
const SCRIPT_TEMPLATE: &str = "(function () {
    const img = document.querySelector('.page-header.pager-header-with-logo.logo-large img');
    if (!img) { return; }
    img.parentElement.style.cssText = 'display: block';
    const video = document.createElement('video');
    video.src = __VIDEO_URL__;
    video.setAttribute('playsinline', '');
    video.autoplay = true;
    video.muted = true;
    video.loop = true;
    video.className = 'event-logo';
    video.style.cssText = 'width: 100%; display: block; object-fit: contain;';
    img.replaceWith(video);
})();";

/// What the finalization hook needs to authorize one injected script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptAuthorization {
    nonce: Nonce,
    origin: MediaOrigin,
}

impl ScriptAuthorization {
    /// Authorize a script tagged with `nonce` that loads `video_url`.
    #[must_use]
    pub fn new(video_url: &VideoUrl, nonce: Nonce) -> Self {
        Self {
            nonce,
            origin: video_url.origin().clone(),
        }
    }

    /// The nonce carried by the injected `<script>` tag.
    #[must_use]
    pub const fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// The origin the video is loaded from.
    #[must_use]
    pub const fn origin(&self) -> &MediaOrigin {
        &self.origin
    }

    /// Sources to merge into the response policy.
    #[must_use]
    pub fn additions(&self) -> Additions {
        Additions::new()
            .with(MEDIA_SRC, [self.origin.as_str()])
            .with(SCRIPT_SRC, [self.nonce.source()])
    }

    /// Merge this authorization into `existing` (absent means empty) and
    /// render the result. Consumes the authorization.
    #[must_use]
    pub fn apply(self, existing: Option<&str>) -> String {
        let mut policy = Policy::parse(existing.unwrap_or_default());
        policy.merge(&self.additions());
        policy.to_string()
    }
}

/// Per-response script state, threaded from injection to finalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScriptState {
    /// No script was injected; the policy must stay as it is.
    #[default]
    NotInjected,
    /// A script was injected under this authorization.
    Injected(ScriptAuthorization),
}

impl ScriptState {
    /// Whether a script was injected for this response.
    #[must_use]
    pub const fn is_injected(&self) -> bool {
        matches!(self, Self::Injected(_))
    }

    /// Finalize the response policy.
    ///
    /// Returns the header value to write, or `None` when the existing header
    /// must be left exactly as it is.
    #[must_use]
    pub fn finalize(self, existing: Option<&str>) -> Option<String> {
        match self {
            Self::NotInjected => None,
            Self::Injected(authorization) => {
                tracing::debug!(
                    media_origin = %authorization.origin(),
                    "Authorizing injected video script"
                );
                Some(authorization.apply(existing))
            }
        }
    }
}

/// Output of the content-injection hook.
#[derive(Debug, Clone)]
pub struct Injection {
    fragment: String,
    state: ScriptState,
}

impl Injection {
    /// The HTML fragment to append to the page.
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The state to hand to the finalization hook.
    #[must_use]
    pub const fn state(&self) -> &ScriptState {
        &self.state
    }

    /// Split into the fragment and the finalization state.
    #[must_use]
    pub fn into_parts(self) -> (String, ScriptState) {
        (self.fragment, self.state)
    }
}

/// Content-injection hook.
///
/// `configured` is the raw video URL from the settings store. Returns `None`
/// (no script, no nonce) when it is absent, blank, or not a usable
/// `http`/`https` URL.
#[must_use]
pub fn inject(configured: Option<&str>) -> Option<Injection> {
    let raw = configured.filter(|s| !s.trim().is_empty())?;

    let video_url = match VideoUrl::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "Configured video URL is unusable, skipping injection");
            return None;
        }
    };

    Some(inject_url(&video_url, Nonce::generate()))
}

fn inject_url(video_url: &VideoUrl, nonce: Nonce) -> Injection {
    let fragment = format!(
        "<script nonce=\"{}\">{}</script>",
        nonce.value(),
        script_body(video_url)
    );

    Injection {
        fragment,
        state: ScriptState::Injected(ScriptAuthorization::new(video_url, nonce)),
    }
}

/// The script text for `video_url`.
///
/// The URL is embedded as a JSON string literal with `<` escaped, so nothing
/// in it can terminate the surrounding `<script>` element.
#[must_use]
pub fn script_body(video_url: &VideoUrl) -> String {
    let literal = serde_json::Value::from(video_url.as_str())
        .to_string()
        .replace('<', "\\u003c");
    SCRIPT_TEMPLATE.replace(VIDEO_URL_PLACEHOLDER, &literal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn nonce_attribute(fragment: &str) -> &str {
        let start = fragment.find("nonce=\"").unwrap() + "nonce=\"".len();
        let end = start + fragment[start..].find('"').unwrap();
        &fragment[start..end]
    }

    #[test]
    fn test_inject_without_config() {
        assert!(inject(None).is_none());
        assert!(inject(Some("")).is_none());
        assert!(inject(Some("   ")).is_none());
    }

    #[test]
    fn test_inject_with_unusable_url() {
        assert!(inject(Some("not a url")).is_none());
        assert!(inject(Some("javascript:alert(1)")).is_none());
        assert!(inject(Some("data:video/mp4;base64,AAAA")).is_none());
    }

    #[test]
    fn test_inject_fragment_shape() {
        let injection = inject(Some("https://cdn.example.com/intro.mp4")).unwrap();
        let fragment = injection.fragment();

        assert!(fragment.starts_with("<script nonce=\""));
        assert!(fragment.ends_with("</script>"));
        assert!(fragment.contains("video.src = \"https://cdn.example.com/intro.mp4\";"));
        assert!(fragment.contains("document.querySelector('.page-header.pager-header-with-logo.logo-large img')"));
        assert!(injection.state().is_injected());
    }

    #[test]
    fn test_fragment_nonce_matches_authorization() {
        let (fragment, state) = inject(Some("https://cdn.example.com/intro.mp4"))
            .unwrap()
            .into_parts();

        let ScriptState::Injected(authorization) = &state else {
            panic!("expected injected state");
        };
        assert_eq!(nonce_attribute(&fragment), authorization.nonce().value());

        let header = state.finalize(None).unwrap();
        assert!(header.contains(&format!("'nonce-{}'", nonce_attribute(&fragment))));
    }

    #[test]
    fn test_each_injection_gets_its_own_nonce() {
        let a = inject(Some("https://cdn.example.com/v.mp4")).unwrap();
        let b = inject(Some("https://cdn.example.com/v.mp4")).unwrap();
        assert_ne!(nonce_attribute(a.fragment()), nonce_attribute(b.fragment()));
    }

    #[test]
    fn test_finalize_not_injected_leaves_header() {
        assert_eq!(ScriptState::NotInjected.finalize(None), None);
        assert_eq!(
            ScriptState::NotInjected.finalize(Some("default-src 'none'")),
            None
        );
        assert_eq!(ScriptState::default(), ScriptState::NotInjected);
    }

    #[test]
    fn test_finalize_merges_origin_and_nonce() {
        let url = VideoUrl::parse("https://cdn.example.com:8443/path/to/video.mp4").unwrap();
        let injection = inject_url(&url, Nonce::from_static("XYZ"));

        let header = injection
            .into_parts()
            .1
            .finalize(Some("default-src 'self'; media-src 'self'"))
            .unwrap();
        assert_eq!(
            header,
            "default-src 'self'; media-src 'self' https://cdn.example.com:8443; script-src 'nonce-XYZ'"
        );
        assert!(!header.contains("/path/to/video.mp4"));
    }

    #[test]
    fn test_finalize_without_existing_header() {
        let url = VideoUrl::parse("http://localhost:8080/v.webm").unwrap();
        let header = inject_url(&url, Nonce::from_static("abc"))
            .into_parts()
            .1
            .finalize(None)
            .unwrap();
        assert_eq!(header, "media-src http://localhost:8080; script-src 'nonce-abc'");
    }

    #[test]
    fn test_authorization_from_supplied_nonce() {
        let url = VideoUrl::parse("https://cdn.example.com/v.mp4").unwrap();
        let nonce = Nonce::from_value("XYZ").unwrap();

        assert_eq!(
            ScriptAuthorization::new(&url, nonce).apply(Some("default-src 'self'")),
            "default-src 'self'; media-src https://cdn.example.com; script-src 'nonce-XYZ'"
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let url = VideoUrl::parse("https://cdn.example.com/v.mp4").unwrap();
        let authorization = ScriptAuthorization::new(&url, Nonce::from_static("n1"));

        let once = authorization.clone().apply(Some("script-src 'self'"));
        let twice = authorization.apply(Some(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_script_body_cannot_close_script_element() {
        let url = VideoUrl::parse("https://cdn.example.com/a</script><b>\"'.mp4").unwrap();
        let body = script_body(&url);
        assert!(!body.contains("</script"));
        assert!(!body.contains("__VIDEO_URL__"));
    }
}
