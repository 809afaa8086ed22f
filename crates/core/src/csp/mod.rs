//! `Content-Security-Policy` parsing, merging and rendering.
//!
//! The engine only knows enough about CSP to add sources to a few fetch
//! directives. Everything else in a header is tokenized and carried through
//! verbatim, so a policy built elsewhere in the stack is never weakened or
//! truncated by passing through here.
//!
//! ```
//! use video_header_core::csp::{Additions, Policy, MEDIA_SRC, SCRIPT_SRC};
//!
//! let mut policy = Policy::parse("default-src 'self'");
//! policy.merge(
//!     &Additions::new()
//!         .with(MEDIA_SRC, ["https://cdn.example.com"])
//!         .with(SCRIPT_SRC, ["'nonce-XYZ'"]),
//! );
//! assert_eq!(
//!     policy.to_string(),
//!     "default-src 'self'; media-src https://cdn.example.com; script-src 'nonce-XYZ'"
//! );
//! ```

mod merge;
mod parse;
mod policy;

pub use merge::Additions;
pub use policy::{Directive, Policy};

/// Fallback for fetch directives that are not listed.
pub const DEFAULT_SRC: &str = "default-src";
/// Governs script execution, including inline `<script>` elements.
pub const SCRIPT_SRC: &str = "script-src";
/// Governs stylesheets and inline `<style>` elements.
pub const STYLE_SRC: &str = "style-src";
/// Governs `<video>` and `<audio>` sources.
pub const MEDIA_SRC: &str = "media-src";

/// Format a nonce as a source expression: `'nonce-<value>'`.
#[must_use]
pub fn nonce_source(nonce: &str) -> String {
    format!("'nonce-{nonce}'")
}
