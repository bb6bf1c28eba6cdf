// src/fetch/http.rs
// =============================================================================
// Fetches a single page and returns its body as text.
//
// Key functionality:
// - GET with our User-Agent and, if configured, a Cookie header
// - Follows 3xx + Location by hand, up to MAX_REDIRECTS hops
// - Rejects non-2xx statuses and non-text content types
// - Aborts the request if it takes longer than the configured timeout
//
// Why follow redirects ourselves?
// - reqwest can follow them, but then we couldn't report a redirect cycle
//   as its own error; with Policy::none() each hop is visible to us
//
// Rust concepts:
// - async/await: one request in flight at a time
// - tokio::time::timeout: dropping the future cancels the request
// =============================================================================

use crate::config::CrawlConfig;
use crate::error::{FetchError, SetupError};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, LOCATION};
use reqwest::{redirect, Client, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["text/html", "text/plain"];

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, SetupError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|_| SetupError::InvalidCookie(cookie.clone()))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    // Fetches `url`, following redirects
    //
    // Returns: the body decoded as UTF-8 (invalid bytes are replaced)
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut current = url.clone();
        for _ in 0..=MAX_REDIRECTS {
            let response = self.send(&current).await?;
            let status = response.status();

            if status.is_redirection() {
                if let Some(location) = response.headers().get(LOCATION) {
                    current = redirect_target(&current, location)?;
                    debug!(from = %url, to = %current, status = status.as_u16(), "following redirect");
                    continue;
                }
            }

            if !status.is_success() {
                return Err(FetchError::BadStatus(status.as_u16()));
            }

            check_content_type(&response)?;
            return self.read_body(response).await;
        }
        Err(FetchError::TooManyRedirects(MAX_REDIRECTS))
    }

    async fn send(&self, url: &Url) -> Result<Response, FetchError> {
        match tokio::time::timeout(self.timeout, self.client.get(url.clone()).send()).await {
            Ok(result) => result.map_err(categorize_error),
            Err(_) => Err(FetchError::Timeout),
        }
    }

    async fn read_body(&self, response: Response) -> Result<String, FetchError> {
        let bytes = match tokio::time::timeout(self.timeout, response.bytes()).await {
            Ok(result) => result.map_err(categorize_error)?,
            Err(_) => return Err(FetchError::Timeout),
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn redirect_target(current: &Url, location: &HeaderValue) -> Result<Url, FetchError> {
    let raw = location
        .to_str()
        .map_err(|_| FetchError::InvalidRedirect(String::from_utf8_lossy(location.as_bytes()).into_owned()))?;
    current
        .join(raw)
        .map_err(|_| FetchError::InvalidRedirect(raw.to_string()))
}

// An absent or empty Content-Type is accepted
fn check_content_type(response: &Response) -> Result<(), FetchError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .trim();

    if content_type.is_empty() {
        return Ok(());
    }
    let lower = content_type.to_ascii_lowercase();
    if ACCEPTED_CONTENT_TYPES.iter().any(|accepted| lower.contains(accepted)) {
        Ok(())
    } else {
        Err(FetchError::UnsupportedContentType(content_type.to_string()))
    }
}

fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(error.to_string())
    }
}
