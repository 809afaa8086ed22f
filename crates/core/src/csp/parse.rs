//! Forgiving tokenizer for `Content-Security-Policy` header values.

use core::convert::Infallible;
use core::str::FromStr;

use super::policy::{Directive, Policy};

impl Policy {
    /// Parse a header value into a policy.
    ///
    /// Segments are split on `;` and then on ASCII whitespace into
    /// `name source...`. Empty segments are skipped, a name with no sources
    /// yields an empty source list, and source expressions are kept opaque.
    /// When a directive name repeats, the first occurrence wins, matching how
    /// user agents enforce the header.
    ///
    /// This never fails: an empty or garbled header degrades to whatever
    /// tokens could be read.
    ///
    /// ```
    /// use video_header_core::csp::Policy;
    ///
    /// let policy = Policy::parse(" script-src 'self' 'self' ;; media-src ");
    /// assert_eq!(policy.sources("script-src").unwrap(), ["'self'"]);
    /// assert!(policy.sources("media-src").unwrap().is_empty());
    /// ```
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let mut policy = Self::new();

        for segment in header.split(';') {
            let mut tokens = segment.split_ascii_whitespace();
            let Some(name) = tokens.next() else {
                continue;
            };

            if !policy.push_if_absent(Directive::new(name, tokens)) {
                tracing::debug!(directive = name, "Ignoring repeated CSP directive");
            }
        }

        policy
    }
}

impl FromStr for Policy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
