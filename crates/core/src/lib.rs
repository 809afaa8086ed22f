//! Video Header Core - CSP merge engine and inline script authorization.
//!
//! This crate lets a host inject one inline script per response (the header
//! video swap) while keeping the response's `Content-Security-Policy` strict:
//! - hosts call [`injector::inject`] while assembling HTML
//! - the same response's [`injector::ScriptState`] is finalized once headers
//!   are known, adding `media-src` and a `'nonce-...'` to `script-src`
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no global state. Per-request state is a value the host carries itself.
//!
//! # Modules
//!
//! - [`csp`] - Policy model, parser, merger and renderer
//! - [`nonce`] - Per-response nonce generation
//! - [`injector`] - The two-hook injection protocol
//! - [`types`] - Validated video URL and media origin

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod csp;
pub mod injector;
pub mod nonce;
pub mod types;

pub use injector::{Injection, ScriptAuthorization, ScriptState};
pub use nonce::{Nonce, NonceError};
pub use types::*;
