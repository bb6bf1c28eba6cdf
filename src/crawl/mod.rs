// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Same-host restriction (optional) and robots.txt checks
// - A page budget and a polite delay between requests
// - Findings grouped by URL folder and written out as JSON
//
// Submodules:
// - canonical: fragment-free URLs used as dedupe keys
// - queue: the frontier (pending queue + visited set)
// - mapping: folder keys, the findings map, persistence
// - engine: the loop that ties everything together
// =============================================================================

mod canonical;
mod engine;
mod mapping;
mod queue;

pub use canonical::CanonicalUrl;
pub use engine::{crawl_site, CrawlCounters, CrawlEngine, CrawlReport, CrawlState};
pub use mapping::{folder_key, persist, Finding, FolderMapping};
pub use queue::Frontier;
