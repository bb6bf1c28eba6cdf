// src/crawl/canonical.rs
// =============================================================================
// CanonicalUrl: the deduplication key for the frontier.
//
// A canonical URL is an absolute URL, parsed by the url crate (which lowercases
// the scheme and host and normalizes the path), with its #fragment removed.
// Two canonical URLs are the same page iff their strings are equal; Url's
// Eq and Hash impls compare the serialized string.
// =============================================================================

use std::fmt;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Url::parse(raw).map(Self::from_url)
    }

    pub fn from_url(mut url: Url) -> Self {
        url.set_fragment(None);
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
