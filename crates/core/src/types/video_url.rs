//! Video source URL and the media origin derived from it.

use core::fmt;

use serde::{Deserialize, Serialize};
use url::{Origin, Url};

/// Errors that can occur when parsing a [`VideoUrl`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VideoUrlError {
    /// The input string is empty or whitespace.
    #[error("video URL cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("video URL must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not an absolute URL.
    #[error("invalid video URL: {0}")]
    Invalid(#[from] url::ParseError),
    /// The scheme is not `http` or `https`.
    #[error("video URL scheme must be http or https, got {0}")]
    UnsupportedScheme(String),
    /// The URL has no host.
    #[error("video URL must have a host")]
    MissingHost,
}

/// A validated video source URL.
///
/// ## Constraints
///
/// - Non-empty after trimming, at most 2048 characters
/// - Absolute URL with an `http` or `https` scheme
/// - Has a host, so a tuple origin can always be derived
///
/// ## Examples
///
/// ```
/// use video_header_core::VideoUrl;
///
/// let url = VideoUrl::parse("https://cdn.example.com:8443/path/to/video.mp4").unwrap();
/// assert_eq!(url.origin().as_str(), "https://cdn.example.com:8443");
///
/// assert!(VideoUrl::parse("").is_err());
/// assert!(VideoUrl::parse("/relative/video.mp4").is_err());
/// assert!(VideoUrl::parse("data:video/mp4;base64,AAAA").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoUrl {
    url: Url,
    origin: MediaOrigin,
}

impl VideoUrl {
    /// Maximum accepted length of the input.
    pub const MAX_LENGTH: usize = 2048;

    /// Parse and validate a video URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty or longer than 2048 characters
    /// - Is not an absolute URL
    /// - Uses a scheme other than `http`/`https`
    /// - Has no host
    pub fn parse(s: &str) -> Result<Self, VideoUrlError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VideoUrlError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(VideoUrlError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let url = Url::parse(s)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(VideoUrlError::UnsupportedScheme(url.scheme().to_owned()));
        }

        let origin = MediaOrigin::from_url(&url).ok_or(VideoUrlError::MissingHost)?;

        Ok(Self { url, origin })
    }

    /// The full URL, as embedded in the injected script.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The parsed URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Scheme, host and port of the URL.
    #[must_use]
    pub const fn origin(&self) -> &MediaOrigin {
        &self.origin
    }
}

impl fmt::Display for VideoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl std::str::FromStr for VideoUrl {
    type Err = VideoUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoUrl {
    type Error = VideoUrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoUrl> for String {
    fn from(value: VideoUrl) -> Self {
        value.url.into()
    }
}

impl AsRef<str> for VideoUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// The origin a video is served from: `scheme://host[:port]`.
///
/// Only this, never the path or query, goes into `media-src`. Default ports
/// are elided and internationalized hosts are punycoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaOrigin(String);

impl MediaOrigin {
    /// Derive the origin of `url`, or `None` when the origin is opaque
    /// (e.g. `data:` or `file:` URLs).
    #[must_use]
    pub fn from_url(url: &Url) -> Option<Self> {
        match url.origin() {
            origin @ Origin::Tuple(..) => Some(Self(origin.ascii_serialization())),
            Origin::Opaque(_) => None,
        }
    }

    /// The serialized origin.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
