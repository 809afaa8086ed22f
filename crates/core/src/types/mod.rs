//! Validated input types.

pub mod video_url;

pub use video_url::{MediaOrigin, VideoUrl, VideoUrlError};
