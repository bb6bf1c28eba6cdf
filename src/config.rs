// src/config.rs
// =============================================================================
// Plain settings struct consumed by the crawl engine.
//
// The CLI (src/cli.rs) builds one of these; tests build them directly with
// struct update syntax: CrawlConfig { max_pages: 1, ..Default::default() }
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_START_URL: &str = "https://example.com/";
pub const DEFAULT_PATTERN: &str = "example";
pub const DEFAULT_USER_AGENT: &str = "pattern-mapper/0.1";
pub const DEFAULT_MAX_PAGES: usize = 300;
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_OUTPUT: &str = "mapping.json";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub start_url: String,
    /// Raw patterns; `/.../` means regex, anything else is a literal
    pub patterns: Vec<String>,
    /// Only follow links whose host equals the start URL's host
    pub same_host_only: bool,
    pub max_pages: usize,
    /// Pause between requests
    pub delay: Duration,
    pub user_agent: String,
    /// Per-fetch timeout
    pub timeout: Duration,
    pub output: PathBuf,
    /// Sent verbatim as the Cookie header
    pub cookie: Option<String>,
    pub respect_robots: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            patterns: vec![DEFAULT_PATTERN.to_string()],
            same_host_only: true,
            max_pages: DEFAULT_MAX_PAGES,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output: PathBuf::from(DEFAULT_OUTPUT),
            cookie: None,
            respect_robots: true,
        }
    }
}
