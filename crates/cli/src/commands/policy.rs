//! Policy inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # Print a fresh nonce
//! vh-cli nonce
//!
//! # Show the media-src origin for a video URL
//! vh-cli origin https://cdn.example.com:8443/path/to/video.mp4
//!
//! # Normalize a policy (dedup sources, tidy whitespace)
//! vh-cli parse "default-src 'self' 'self';; img-src data:"
//!
//! # Finalize a policy the way the server does for an injected script
//! vh-cli merge --header "default-src 'self'" --video-url https://cdn.example.com/v.mp4
//! ```
//!
//! Each command returns the text to print so it can be tested directly.

use thiserror::Error;
use video_header_core::csp::Policy;
use video_header_core::{Nonce, NonceError, ScriptAuthorization, VideoUrl, VideoUrlError};

/// Errors that can occur during policy commands.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The video URL failed validation.
    #[error("Invalid video URL: {0}")]
    InvalidVideoUrl(#[from] VideoUrlError),

    /// A supplied nonce would break the source expression.
    #[error("Invalid nonce: {0}")]
    InvalidNonce(#[from] NonceError),
}

/// Generate a fresh nonce.
#[must_use]
pub fn nonce() -> String {
    Nonce::generate().to_string()
}

/// The `media-src` origin of a video URL.
///
/// # Errors
///
/// Returns `PolicyError::InvalidVideoUrl` if the URL fails validation.
pub fn origin(video_url: &str) -> Result<String, PolicyError> {
    Ok(VideoUrl::parse(video_url)?.origin().to_string())
}

/// Parse and re-render a policy.
#[must_use]
pub fn parse(header: &str) -> String {
    Policy::parse(header).to_string()
}

/// Merge the video origin and a nonce into `header`.
///
/// A fresh nonce is generated when none is given.
///
/// # Errors
///
/// Returns an error if the video URL or the supplied nonce is invalid.
pub fn merge(
    header: Option<&str>,
    video_url: &str,
    nonce: Option<&str>,
) -> Result<String, PolicyError> {
    let video_url = VideoUrl::parse(video_url)?;
    let nonce = match nonce {
        Some(value) => Nonce::from_value(value)?,
        None => Nonce::generate(),
    };

    Ok(ScriptAuthorization::new(&video_url, nonce).apply(header))
}
