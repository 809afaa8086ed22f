//! In-memory representation of a `Content-Security-Policy` header value.

use core::fmt;

/// A single directive: its name and the ordered, de-duplicated source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: String,
    sources: Vec<String>,
}

impl Directive {
    /// Create a directive, collapsing duplicate sources (first occurrence wins).
    pub fn new<I, S>(name: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut directive = Self {
            name: name.into(),
            sources: Vec::new(),
        };
        directive.extend(sources);
        directive
    }

    /// The directive name, e.g. `script-src`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source expressions in order of first appearance.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Whether `source` is already present in this directive.
    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s == source)
    }

    /// Append sources that are not yet present, keeping existing order.
    ///
    /// Returns the number of sources actually added.
    pub fn extend<I, S>(&mut self, sources: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.sources.len();
        for source in sources {
            let source = source.into();
            if !self.contains(&source) {
                self.sources.push(source);
            }
        }
        self.sources.len() - before
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for source in &self.sources {
            write!(f, " {source}")?;
        }
        Ok(())
    }
}

/// A parsed policy: directives keyed by name, kept in insertion order.
///
/// Directive names are compared case-sensitively. Directives this crate never
/// touches are carried through untouched, so rendering a parsed policy gives
/// back everything that was read.
///
/// # Rendering
///
/// `Display` emits `name src src; name src` with directives joined by `"; "`.
/// A directive with no sources is emitted as its bare name.
///
/// ```
/// use video_header_core::csp::Policy;
///
/// let policy = Policy::parse("default-src 'self';  upgrade-insecure-requests");
/// assert_eq!(policy.to_string(), "default-src 'self'; upgrade-insecure-requests");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    directives: Vec<Directive>,
}

impl Policy {
    /// Create an empty policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            directives: Vec::new(),
        }
    }

    /// Number of directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Whether the policy has no directives at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Look up a directive by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Directive> {
        self.directives.iter_mut().find(|d| d.name == name)
    }

    /// Source list of a directive, if the directive exists.
    #[must_use]
    pub fn sources(&self, name: &str) -> Option<&[String]> {
        self.get(name).map(Directive::sources)
    }

    /// Whether directive `name` exists and lists `source`.
    #[must_use]
    pub fn contains_source(&self, name: &str, source: &str) -> bool {
        self.get(name).is_some_and(|d| d.contains(source))
    }

    /// Replace the source list of `name`, appending the directive if it is new.
    ///
    /// An existing directive keeps its position.
    pub fn set<I, S>(&mut self, name: &str, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let directive = Directive::new(name, sources);
        match self.get_mut(name) {
            Some(existing) => *existing = directive,
            None => self.directives.push(directive),
        }
    }

    /// Append a directive unless one with the same name already exists.
    ///
    /// Returns `false` when the name was taken and nothing changed.
    pub(crate) fn push_if_absent(&mut self, directive: Directive) -> bool {
        if self.get(directive.name()).is_some() {
            return false;
        }
        self.directives.push(directive);
        true
    }

    /// Iterate over directives in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.directives.iter()
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, directive) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{directive}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Policy {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_dedups_sources() {
        let directive = Directive::new("script-src", ["'self'", "https://a", "'self'"]);
        assert_eq!(directive.sources(), ["'self'", "https://a"]);
    }

    #[test]
    fn test_directive_extend_reports_added() {
        let mut directive = Directive::new("media-src", ["'self'"]);
        assert_eq!(directive.extend(["'self'", "https://cdn"]), 1);
        assert_eq!(directive.extend(["https://cdn"]), 0);
        assert_eq!(directive.sources(), ["'self'", "https://cdn"]);
    }

    #[test]
    fn test_render_empty_policy() {
        assert_eq!(Policy::new().to_string(), "");
    }

    #[test]
    fn test_render_bare_directive() {
        let mut policy = Policy::new();
        policy.set("media-src", Vec::<String>::new());
        policy.set("default-src", ["'none'"]);
        assert_eq!(policy.to_string(), "media-src; default-src 'none'");
    }

    #[test]
    fn test_set_keeps_position() {
        let mut policy = Policy::new();
        policy.set("default-src", ["'self'"]);
        policy.set("img-src", ["data:"]);
        policy.set("default-src", ["'none'"]);

        let names: Vec<&str> = policy.iter().map(Directive::name).collect();
        assert_eq!(names, ["default-src", "img-src"]);
        assert_eq!(policy.sources("default-src").unwrap(), ["'none'"]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut policy = Policy::new();
        policy.set("script-src", ["'self'"]);
        assert!(policy.get("Script-Src").is_none());
        assert!(policy.contains_source("script-src", "'self'"));
    }

    #[test]
    fn test_push_if_absent() {
        let mut policy = Policy::new();
        assert!(policy.push_if_absent(Directive::new("img-src", ["a"])));
        assert!(!policy.push_if_absent(Directive::new("img-src", ["b"])));
        assert_eq!(policy.sources("img-src").unwrap(), ["a"]);
        assert_eq!(policy.len(), 1);
    }
}
