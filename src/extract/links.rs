// src/extract/links.rs
// =============================================================================
// Finds href="..." and src="..." attributes in raw markup and resolves their
// values to absolute URLs.
//
// We scan the raw text with a regex instead of parsing HTML because callers
// need the byte offset of every attribute: content matches look for the
// nearest link around them.
//
// Rust concepts:
// - OnceLock: compile the regex once, on first use
// - Option: resolve() returns None for values that aren't valid URLs
// =============================================================================

use crate::crawl::CanonicalUrl;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// One attribute value found in the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink<'c> {
    /// Byte offset of the attribute name
    pub offset: usize,
    /// Byte offset of the value itself, just inside the quote
    pub value_offset: usize,
    /// The quoted value, exactly as written
    pub value: &'c str,
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    // Constant pattern, so compiling it can't fail at runtime
    ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:href|src)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("attribute regex is valid")
    })
}

// Returns every href/src attribute in document order
//
// Example:
//   r#"<a HREF="/docs">x</a><img src='/a.png'>"#
//   -> [(3, "/docs"), (26, "/a.png")]
pub fn extract_links(content: &str) -> Vec<RawLink<'_>> {
    attribute_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = caps.get(1).or_else(|| caps.get(2))?;
            Some(RawLink {
                offset: whole.start(),
                value_offset: value.start(),
                value: value.as_str(),
            })
        })
        .collect()
}

// Resolves an attribute value against the page it was found on
//
// Values that already start with http:// or https:// are parsed as-is,
// everything else (relative paths, "mailto:", "#top") goes through Url::join.
// Non-http results are still returned; link discovery filters them.
pub fn resolve(raw: &str, base: &Url) -> Option<CanonicalUrl> {
    let raw = raw.trim();
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    let resolved = if lower.starts_with("http://") || lower.starts_with("https://") {
        Url::parse(raw)
    } else {
        base.join(raw)
    };
    resolved.ok().map(CanonicalUrl::from_url)
}
