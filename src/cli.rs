// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag maps onto one field of CrawlConfig, and every flag can also be
// set through a PATTERN_MAPPER_* environment variable.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates the argument parser
// - From trait: converting the parsed Cli into the engine's CrawlConfig
// =============================================================================

use clap::Parser;
use pattern_mapper::config::{
    CrawlConfig, DEFAULT_DELAY_MS, DEFAULT_MAX_PAGES, DEFAULT_OUTPUT, DEFAULT_PATTERN,
    DEFAULT_START_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "pattern-mapper",
    version,
    about = "Crawl a website and map where text patterns occur, grouped by URL folder",
    long_about = "pattern-mapper crawls a site breadth-first from a start URL, searches every page's raw \
                  markup and every href/src value for the given patterns, and writes the matches to a \
                  JSON file keyed by URL folder."
)]
pub struct Cli {
    /// URL to start crawling from
    #[arg(long, env = "PATTERN_MAPPER_START_URL", default_value = DEFAULT_START_URL)]
    pub start_url: String,

    /// Pattern to look for (repeatable)
    ///
    /// Wrap in slashes for a regular expression: --pattern '/art(work)?s/'
    /// Anything else is matched literally. Matching ignores case.
    #[arg(short, long = "pattern", env = "PATTERN_MAPPER_PATTERN", default_value = DEFAULT_PATTERN)]
    pub patterns: Vec<String>,

    /// Follow links to other hosts too
    #[arg(long, env = "PATTERN_MAPPER_ALL_HOSTS")]
    pub all_hosts: bool,

    /// Stop after this many pages (failed fetches count)
    #[arg(long, env = "PATTERN_MAPPER_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// Milliseconds to wait between requests
    #[arg(long, env = "PATTERN_MAPPER_DELAY_MS", default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    #[arg(long, env = "PATTERN_MAPPER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "PATTERN_MAPPER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Where to write the JSON mapping
    #[arg(short, long, env = "PATTERN_MAPPER_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Value sent as the Cookie header on every request
    #[arg(long, env = "PATTERN_MAPPER_COOKIE")]
    pub cookie: Option<String>,

    /// Don't fetch or obey robots.txt
    #[arg(long, env = "PATTERN_MAPPER_IGNORE_ROBOTS")]
    pub ignore_robots: bool,

    /// Log every page fetched (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Cli> for CrawlConfig {
    fn from(cli: Cli) -> Self {
        Self {
            start_url: cli.start_url,
            patterns: cli.patterns,
            same_host_only: !cli.all_hosts,
            max_pages: cli.max_pages,
            delay: Duration::from_millis(cli.delay_ms),
            user_agent: cli.user_agent,
            timeout: Duration::from_secs(cli.timeout_secs),
            output: cli.output,
            cookie: cli.cookie,
            respect_robots: !cli.ignore_robots,
        }
    }
}
