// src/extract/mod.rs
// =============================================================================
// Everything that reads page content:
// - links: finds href/src attributes and resolves them to absolute URLs
// - findings: turns pattern matches into Finding records with snippets
// =============================================================================

mod findings;
mod links;

pub use findings::{content_findings, link_findings};
pub use links::{extract_links, resolve, RawLink};
