// src/lib.rs
// =============================================================================
// pattern-mapper: crawl a site breadth-first and record every place a set of
// text patterns shows up, grouped by URL folder.
//
// The binary (src/main.rs) only parses arguments, sets up logging and prints
// a summary; everything else lives here so it can be tested directly.
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pattern;

pub use config::CrawlConfig;
pub use crawl::{crawl_site, CrawlCounters, CrawlEngine, CrawlReport, Finding, FolderMapping};
pub use error::{CrawlError, FetchError};
