// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Two kinds of failure exist:
// - Fatal ones (bad seed URL, malformed regex, can't write the mapping)
//   stop the program. They all convert into CrawlError.
// - Per-page ones (FetchError) are logged and the crawl moves on.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: generates From impls so the ? operator converts errors for us
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Why a single page (or robots.txt) could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, body read failure, ...
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// Anything outside the 2xx range that isn't a followable redirect
    #[error("unexpected HTTP status {0}")]
    BadStatus(u16),

    #[error("unsupported content type '{0}'")]
    UnsupportedContentType(String),

    #[error("gave up after {0} redirects")]
    TooManyRedirects(usize),

    /// A Location header that can't be read or resolved
    #[error("invalid redirect location '{0}'")]
    InvalidRedirect(String),
}

#[derive(Debug, Error)]
#[error("invalid pattern '{pattern}': {source}")]
pub struct PatternCompileError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid start URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("start URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("cookie value '{0}' is not a valid header value")]
    InvalidCookie(String),

    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not serialize mapping: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Every error that ends a crawl early.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Pattern(#[from] PatternCompileError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}
