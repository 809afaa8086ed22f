//! Per-response nonces for inline script authorization.
//!
//! Each nonce is 128 bits from the thread-local CSPRNG, base64-encoded so it
//! can go straight into a `nonce` attribute and a `'nonce-...'` source.

use core::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

/// Length of the raw random bytes (16 bytes = 128 bits).
pub const NONCE_BYTES_LEN: usize = 16;

/// Errors accepting an externally supplied nonce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NonceError {
    #[error("nonce cannot be empty")]
    Empty,

    /// Anything outside the base64 alphabets could end the source expression.
    #[error("nonce {0:?} contains characters outside base64")]
    InvalidCharacters(String),
}

/// A single-use CSP nonce.
///
/// Fresh values come from [`Nonce::generate`] or [`Nonce::generate_with`];
/// [`Nonce::from_value`] accepts one chosen elsewhere, e.g. on the command line.
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Generate a fresh nonce from the thread-local CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Generate a nonce from a caller-supplied cryptographic RNG.
    #[must_use]
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; NONCE_BYTES_LEN];
        rng.fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// Accept an existing nonce value.
    ///
    /// # Errors
    ///
    /// Returns `NonceError` if `value` is empty or has characters outside the
    /// standard and URL-safe base64 alphabets.
    pub fn from_value(value: &str) -> Result<Self, NonceError> {
        if value.is_empty() {
            return Err(NonceError::Empty);
        }
        let is_base64 = value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'-' | b'_' | b'='));
        if !is_base64 {
            return Err(NonceError::InvalidCharacters(value.to_owned()));
        }
        Ok(Self(value.to_owned()))
    }

    /// The encoded value, as written into the `nonce` attribute.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// The value as a CSP source expression, `'nonce-<value>'`.
    #[must_use]
    pub fn source(&self) -> String {
        crate::csp::nonce_source(&self.0)
    }

    #[cfg(test)]
    pub(crate) fn from_static(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Keep nonces out of logs.
impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nonce([REDACTED])")
    }
}
