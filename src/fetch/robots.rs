// src/fetch/robots.rs
// =============================================================================
// Minimal robots.txt support.
//
// Only two things matter:
// - sections addressed to "User-agent: *"
// - "Disallow: /prefix" lines inside those sections
//
// A URL is denied when its path starts with any disallowed prefix. There is no
// wildcard ("*", "$") matching and Allow lines are ignored.
//
// If robots.txt can't be fetched the site is treated as allowing everything.
// =============================================================================

use super::http::Fetcher;
use tracing::{info, warn};
use url::Url;

/// Disallowed path prefixes for the wildcard user agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRuleset {
    disallowed: Vec<String>,
}

impl RobotsRuleset {
    /// A ruleset that allows every path.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn parse(body: &str) -> Self {
        let mut disallowed = Vec::new();
        let mut in_wildcard_section = false;

        for line in body.lines() {
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim();
            let value = value.trim();

            if field.eq_ignore_ascii_case("user-agent") {
                in_wildcard_section = value == "*";
            } else if field.eq_ignore_ascii_case("disallow") && in_wildcard_section && !value.is_empty() {
                disallowed.push(value.to_string());
            }
        }

        Self { disallowed }
    }

    pub fn disallowed(&self) -> &[String] {
        &self.disallowed
    }

    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let path = match parsed.path() {
            "" => "/",
            path => path,
        };
        !self.disallowed.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

// Fetches and parses <scheme>://<host>[:port]/robots.txt for the origin
//
// Never fails: any fetch error is logged as a warning and yields an empty
// ruleset.
pub async fn load(fetcher: &Fetcher, origin: &Url) -> RobotsRuleset {
    let robots_url = match origin.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            warn!(%origin, error = %e, "could not build robots.txt URL, allowing everything");
            return RobotsRuleset::allow_all();
        }
    };

    match fetcher.fetch(&robots_url).await {
        Ok(body) => {
            let rules = RobotsRuleset::parse(&body);
            info!(url = %robots_url, rules = rules.disallowed.len(), "loaded robots.txt");
            rules
        }
        Err(e) => {
            warn!(url = %robots_url, error = %e, "robots.txt unavailable, allowing everything");
            RobotsRuleset::allow_all()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;

    const ROBOTS: &str = "\
User-agent: Googlebot
Disallow: /google-only

User-agent: *
Disallow: /private
Disallow:
Allow: /private/open
Crawl-delay: 5

User-agent: BadBot
Disallow: /
";

    #[test]
    fn test_parse_only_wildcard_section() {
        let rules = RobotsRuleset::parse(ROBOTS);
        assert_eq!(rules.disallowed(), ["/private".to_string()]);
    }

    #[test]
    fn test_directives_are_case_insensitive() {
        let rules = RobotsRuleset::parse("USER-AGENT: *\ndisALLOW: /tmp\n");
        assert_eq!(rules.disallowed(), ["/tmp".to_string()]);
    }

    #[test]
    fn test_is_allowed_prefix() {
        let rules = RobotsRuleset::parse("User-agent: *\nDisallow: /private\n");
        assert!(!rules.is_allowed("https://a.test/private/page.html"));
        assert!(rules.is_allowed("https://a.test/public/page.html"));
        assert!(rules.is_allowed("https://a.test/"));
    }

    #[test]
    fn test_prefix_match_is_plain_string_prefix() {
        let rules = RobotsRuleset::parse("User-agent: *\nDisallow: /priv\n");
        assert!(!rules.is_allowed("https://a.test/private"));
    }

    #[test]
    fn test_malformed_url_is_denied() {
        assert!(!RobotsRuleset::allow_all().is_allowed("not a url"));
    }

    #[tokio::test]
    async fn test_load_from_server() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/robots.txt")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("User-agent: *\nDisallow: /admin\n")
            .create_async()
            .await;

        let fetcher = Fetcher::new(&CrawlConfig::default()).unwrap();
        let origin = Url::parse(&format!("{}/some/page", server.url())).unwrap();
        let rules = load(&fetcher, &origin).await;
        assert_eq!(rules.disallowed(), ["/admin".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_robots_allows_everything() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/robots.txt").with_status(404).create_async().await;

        let fetcher = Fetcher::new(&CrawlConfig::default()).unwrap();
        let origin = Url::parse(&server.url()).unwrap();
        assert_eq!(load(&fetcher, &origin).await, RobotsRuleset::allow_all());
    }
}
