//! Set-union merge of required sources into an existing policy.

use super::policy::{Directive, Policy};

/// Ordered `directive -> sources` additions to merge into a [`Policy`].
///
/// ```
/// use video_header_core::csp::{Additions, MEDIA_SRC, SCRIPT_SRC};
///
/// let additions = Additions::new()
///     .with(MEDIA_SRC, ["https://cdn.example.com"])
///     .with(SCRIPT_SRC, ["'nonce-XYZ'"]);
/// assert_eq!(additions.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Additions {
    entries: Vec<Directive>,
}

impl Additions {
    /// Create an empty set of additions.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add sources for `directive`.
    ///
    /// Calling this again for the same directive extends its source list.
    #[must_use]
    pub fn with<I, S>(mut self, directive: &str, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.entries.iter_mut().find(|d| d.name() == directive) {
            Some(existing) => {
                existing.extend(sources);
            }
            None => self.entries.push(Directive::new(directive, sources)),
        }
        self
    }

    /// Number of directives touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to merge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the additions in the order they were given.
    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Additions {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Policy {
    /// Merge `additions` into this policy.
    ///
    /// Missing directives are appended after the existing ones, in the order
    /// given. Existing directives keep their sources and order; only sources
    /// not already listed are appended. Directives not named in `additions`
    /// are left alone, and merging the same additions twice is a no-op the
    /// second time.
    pub fn merge(&mut self, additions: &Additions) {
        for addition in additions {
            match self.get_mut(addition.name()) {
                Some(existing) => {
                    existing.extend(addition.sources().iter().cloned());
                }
                None => {
                    self.push_if_absent(addition.clone());
                }
            }
        }
    }

    /// Owned variant of [`Policy::merge`].
    #[must_use]
    pub fn merged(mut self, additions: &Additions) -> Self {
        self.merge(additions);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::csp::{MEDIA_SRC, SCRIPT_SRC, STYLE_SRC};

    fn video_additions() -> Additions {
        Additions::new()
            .with(MEDIA_SRC, ["https://cdn.example.com"])
            .with(SCRIPT_SRC, ["'nonce-XYZ'"])
    }

    #[test]
    fn test_merge_appends_new_directives_in_given_order() {
        let policy = Policy::parse("default-src 'self'").merged(&video_additions());
        assert_eq!(
            policy.to_string(),
            "default-src 'self'; media-src https://cdn.example.com; script-src 'nonce-XYZ'"
        );
    }

    #[test]
    fn test_merge_appends_missing_sources_after_existing() {
        let policy = Policy::parse("script-src 'self' https://js.example.com; media-src 'self'")
            .merged(&video_additions());
        assert_eq!(
            policy.to_string(),
            "script-src 'self' https://js.example.com 'nonce-XYZ'; media-src 'self' https://cdn.example.com"
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let headers = [
            "",
            "default-src 'self'",
            "script-src 'nonce-XYZ'; media-src",
            "media-src https://cdn.example.com https://cdn.example.com; img-src *",
        ];

        for header in headers {
            let once = Policy::parse(header).merged(&video_additions());
            let twice = once.clone().merged(&video_additions());
            assert_eq!(once.to_string(), twice.to_string(), "header: {header:?}");
        }
    }

    #[test]
    fn test_merge_fills_empty_directive() {
        let policy = Policy::parse("media-src").merged(&video_additions());
        assert_eq!(
            policy.sources(MEDIA_SRC).unwrap(),
            ["https://cdn.example.com"]
        );
    }

    #[test]
    fn test_merge_leaves_other_directives_untouched() {
        let policy = Policy::parse("style-src 'self' 'unsafe-inline'; frame-ancestors 'none'")
            .merged(&video_additions());
        assert_eq!(
            policy.sources(STYLE_SRC).unwrap(),
            ["'self'", "'unsafe-inline'"]
        );
        assert_eq!(policy.sources("frame-ancestors").unwrap(), ["'none'"]);
    }

    #[test]
    fn test_merge_dedups_within_additions() {
        let additions = Additions::new()
            .with(SCRIPT_SRC, ["'nonce-a'", "'nonce-a'"])
            .with(SCRIPT_SRC, ["'nonce-a'", "'self'"]);
        assert_eq!(additions.len(), 1);

        let policy = Policy::new().merged(&additions);
        assert_eq!(policy.to_string(), "script-src 'nonce-a' 'self'");
    }

    #[test]
    fn test_merge_empty_additions_is_noop() {
        let header = "default-src 'none'; img-src 'self'";
        let policy = Policy::parse(header).merged(&Additions::new());
        assert_eq!(policy.to_string(), header);
    }
}
