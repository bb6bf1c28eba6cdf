// src/extract/findings.rs
// =============================================================================
// Turns pattern matches on a page into Finding records.
//
// Two passes per page:
// 1. Content pass: every occurrence of every pattern in the raw markup.
//    The finding's full_url is the href/src value closest to the match
//    (within LINK_WINDOW bytes), resolved against the page URL.
// 2. Link pass: every href/src value that itself matches a pattern.
//    The finding's match is the raw value and full_url its resolved form.
//
// A match inside an href value is seen by both passes and so is reported
// twice. Callers count findings, so both are kept.
// =============================================================================

use super::links::{resolve, RawLink};
use crate::crawl::Finding;
use crate::pattern::Pattern;
use url::Url;

/// How far (in bytes) from a match we look for an associated link.
pub const LINK_WINDOW: usize = 300;
/// Bytes of context taken on each side of a match for the snippet.
pub const SNIPPET_CONTEXT: usize = 80;
/// Upper bound on snippet length, in characters.
pub const SNIPPET_MAX_CHARS: usize = 240;

// Findings come back in document order. Occurrences of different patterns
// at the same offset keep the order the patterns were given in.
pub fn content_findings(
    content: &str,
    page_url: &Url,
    patterns: &[Pattern],
    links: &[RawLink<'_>],
) -> Vec<Finding> {
    let mut occurrences: Vec<_> = patterns.iter().flat_map(|p| p.occurrences(content)).collect();
    occurrences.sort_by_key(|occurrence| occurrence.start);

    occurrences
        .into_iter()
        .map(|occurrence| Finding {
            page_url: page_url.to_string(),
            matched: occurrence.text.to_string(),
            full_url: nearest_link(links, occurrence.start)
                .and_then(|link| resolve(link.value, page_url))
                .map(|url| url.to_string()),
            snippet: snippet(content, occurrence.start, occurrence.end),
        })
        .collect()
}

pub fn link_findings(
    content: &str,
    page_url: &Url,
    patterns: &[Pattern],
    links: &[RawLink<'_>],
) -> Vec<Finding> {
    links
        .iter()
        .filter(|link| patterns.iter().any(|p| p.is_match(link.value)))
        .map(|link| Finding {
            page_url: page_url.to_string(),
            matched: link.value.to_string(),
            full_url: resolve(link.value, page_url).map(|url| url.to_string()),
            snippet: snippet(content, link.value_offset, link.value_offset + link.value.len()),
        })
        .collect()
}

// Picks the link whose attribute starts closest to the start of the match,
// ignoring links more than LINK_WINDOW bytes away. Ties go to the earlier link.
fn nearest_link<'a, 'c>(links: &'a [RawLink<'c>], start: usize) -> Option<&'a RawLink<'c>> {
    links
        .iter()
        .map(|link| (link.offset.abs_diff(start), link))
        .filter(|(distance, _)| *distance <= LINK_WINDOW)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, link)| link)
}

// Cuts the text around [start, end), collapses runs of whitespace to a
// single space and caps the result at SNIPPET_MAX_CHARS characters
pub fn snippet(content: &str, start: usize, end: usize) -> String {
    let from = floor_char_boundary(content, start.saturating_sub(SNIPPET_CONTEXT));
    let to = ceil_char_boundary(content, end.saturating_add(SNIPPET_CONTEXT));
    let collapsed = content[from..to].split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(SNIPPET_MAX_CHARS).collect()
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
