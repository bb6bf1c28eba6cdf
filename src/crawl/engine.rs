// src/crawl/engine.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. new(): validate the seed URL, compile patterns, build the HTTP client,
//    put the seed in the frontier. Any failure here is fatal.
// 2. run(): load robots.txt, then until the queue is empty or the page
//    budget is used up:
//      - pop the next URL
//      - skip it if visited or disallowed by robots.txt (not counted)
//      - mark it visited and fetch it (counted, even if the fetch fails)
//      - match patterns against the content and against every link value
//      - record findings under the page's folder key
//      - queue newly discovered http(s) links
//      - sleep for the configured delay
//
// One fetch is in flight at a time, so pages are attempted in exact
// breadth-first discovery order and nothing here needs a lock.
// =============================================================================

use super::canonical::CanonicalUrl;
use super::mapping::{folder_key, persist, FolderMapping};
use super::queue::Frontier;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, SetupError};
use crate::extract::{content_findings, extract_links, link_findings, resolve, RawLink};
use crate::fetch::{load_robots, Fetcher, RobotsRuleset};
use crate::pattern::{self, Pattern};
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Init,
    Running,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlCounters {
    /// Pages fetched or attempted; this is what the page budget counts
    pub pages_attempted: usize,
    pub pages_failed: usize,
    pub robots_skipped: usize,
    pub links_enqueued: usize,
    pub findings: usize,
}

/// Everything a finished crawl produced.
#[derive(Debug)]
pub struct CrawlReport {
    pub mapping: FolderMapping,
    pub counters: CrawlCounters,
    /// URLs still queued when the page budget ran out, oldest first
    pub unvisited: Vec<CanonicalUrl>,
    /// URLs marked visited, including ones skipped by robots.txt
    pub visited: usize,
}

pub struct CrawlEngine {
    config: CrawlConfig,
    start: Url,
    patterns: Vec<Pattern>,
    fetcher: Fetcher,
    robots: RobotsRuleset,
    frontier: Frontier,
    mapping: FolderMapping,
    counters: CrawlCounters,
    state: CrawlState,
}

impl CrawlEngine {
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let seed = parse_seed(&config.start_url)?;
        let patterns = pattern::compile(&config.patterns)?;
        let fetcher = Fetcher::new(&config)?;

        let mut frontier = Frontier::new();
        frontier.enqueue(seed.clone());

        Ok(Self {
            config,
            start: seed.as_url().clone(),
            patterns,
            fetcher,
            robots: RobotsRuleset::allow_all(),
            frontier,
            mapping: FolderMapping::new(),
            counters: CrawlCounters::default(),
            state: CrawlState::Init,
        })
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub async fn run(mut self) -> CrawlReport {
        self.state = CrawlState::Running;
        info!(
            start = %self.start,
            patterns = ?self.config.patterns,
            max_pages = self.config.max_pages,
            same_host_only = self.config.same_host_only,
            "starting crawl"
        );

        if self.config.respect_robots {
            self.robots = load_robots(&self.fetcher, &self.start).await;
        }

        while self.counters.pages_attempted < self.config.max_pages {
            let Some(url) = self.frontier.dequeue() else {
                break;
            };
            if !self.visit(url).await {
                continue;
            }

            let budget_left = self.counters.pages_attempted < self.config.max_pages;
            if !self.config.delay.is_zero() && budget_left && !self.frontier.is_empty() {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        self.state = CrawlState::Done;
        info!(
            pages = self.counters.pages_attempted,
            failed = self.counters.pages_failed,
            robots_skipped = self.counters.robots_skipped,
            findings = self.counters.findings,
            visited = self.frontier.visited_len(),
            unvisited = self.frontier.pending_len(),
            "crawl finished"
        );

        CrawlReport {
            mapping: self.mapping,
            counters: self.counters,
            visited: self.frontier.visited_len(),
            unvisited: self.frontier.into_pending(),
        }
    }

    // Handles one dequeued URL
    //
    // Returns true if the URL counted toward the page budget
    async fn visit(&mut self, url: CanonicalUrl) -> bool {
        if self.frontier.is_visited(&url) {
            return false;
        }
        if !self.robots.is_allowed(url.as_str()) {
            info!(%url, "disallowed by robots.txt, skipping");
            self.frontier.mark_visited(url);
            self.counters.robots_skipped += 1;
            return false;
        }

        self.frontier.mark_visited(url.clone());
        self.counters.pages_attempted += 1;
        debug!(page = self.counters.pages_attempted, %url, "fetching");

        let content = match self.fetcher.fetch(url.as_url()).await {
            Ok(content) => content,
            Err(e) => {
                warn!(%url, error = %e, "fetch failed");
                self.counters.pages_failed += 1;
                return true;
            }
        };

        let page = url.as_url();
        let links = extract_links(&content);
        let mut findings = content_findings(&content, page, &self.patterns, &links);
        findings.extend(link_findings(&content, page, &self.patterns, &links));

        debug!(%url, findings = findings.len(), links = links.len(), "scanned page");
        if !findings.is_empty() {
            self.counters.findings += findings.len();
            self.mapping.record(&folder_key(url.as_str()), findings);
        }

        self.discover(page, &links);
        true
    }

    fn discover(&mut self, page: &Url, links: &[RawLink<'_>]) {
        for link in links {
            let Some(target) = resolve(link.value, page) else {
                continue;
            };
            if !matches!(target.as_url().scheme(), "http" | "https") {
                continue;
            }
            if self.config.same_host_only && target.as_url().host_str() != self.start.host_str() {
                continue;
            }
            if self.frontier.enqueue(target) {
                self.counters.links_enqueued += 1;
            }
        }
    }
}

fn parse_seed(raw: &str) -> Result<CanonicalUrl, SetupError> {
    let seed = CanonicalUrl::parse(raw.trim()).map_err(|source| SetupError::InvalidSeed {
        url: raw.to_string(),
        source,
    })?;
    match seed.as_url().scheme() {
        "http" | "https" => Ok(seed),
        _ => Err(SetupError::UnsupportedScheme(raw.to_string())),
    }
}

// Runs a whole crawl and writes the mapping to config.output
pub async fn crawl_site(config: CrawlConfig) -> Result<CrawlReport, CrawlError> {
    let output = config.output.clone();
    let report = CrawlEngine::new(config)?.run().await;
    persist(&report.mapping, &output)?;
    info!(path = %output.display(), folders = report.mapping.folder_count(), "mapping written");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(start: &str, patterns: &[&str]) -> CrawlConfig {
        CrawlConfig {
            start_url: start.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            delay: Duration::ZERO,
            timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    async fn html(server: &mut mockito::Server, path: &str, body: &str) -> mockito::Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(body)
            .create_async()
            .await
    }

    async fn robots(server: &mut mockito::Server, body: &str) -> mockito::Mock {
        server
            .mock("GET", "/robots.txt")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body(body)
            .create_async()
            .await
    }

    #[test]
    fn test_seed_is_first_in_frontier() {
        let mut engine = CrawlEngine::new(config("https://a.test/start#top", &["x"])).unwrap();
        assert_eq!(engine.state(), CrawlState::Init);
        assert_eq!(engine.frontier.dequeue().unwrap().as_str(), "https://a.test/start");
    }

    #[test]
    fn test_invalid_seed_is_fatal() {
        let err = CrawlEngine::new(config("not a url", &["x"])).err().unwrap();
        assert!(matches!(err, CrawlError::Setup(SetupError::InvalidSeed { .. })));

        let err = CrawlEngine::new(config("ftp://a.test/", &["x"])).err().unwrap();
        assert!(matches!(err, CrawlError::Setup(SetupError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_bad_pattern_is_fatal() {
        let err = CrawlEngine::new(config("https://a.test/", &["/[oops/"])).err().unwrap();
        assert!(matches!(err, CrawlError::Pattern(ref e) if e.pattern == "/[oops/"));
    }

    #[tokio::test]
    async fn test_robots_skip_and_root_finding() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        robots(&mut server, "User-agent: *\nDisallow: /private\n").await;
        html(
            &mut server,
            "/",
            r#"<a href="/private/x">target here</a> <a href="/ok">ok</a>"#,
        )
        .await;
        let ok = html(
            &mut server,
            "/ok",
            r#"<p>nothing to see</p> <a href="/private/x#again">again</a>"#,
        )
        .await;
        let private = server
            .mock("GET", "/private/x")
            .expect(0)
            .create_async()
            .await;

        let report = CrawlEngine::new(config(&format!("{base}/"), &["target"]))
            .unwrap()
            .run()
            .await;

        ok.assert_async().await;
        private.assert_async().await;
        assert_eq!(report.counters.pages_attempted, 2);
        // /private/x was marked visited on the skip, so the second link to it
        // from /ok is never queued again
        assert_eq!(report.counters.robots_skipped, 1);
        assert_eq!(report.visited, 3);
        assert_eq!(report.counters.findings, 1);

        let root = report.mapping.get("/").unwrap();
        assert_eq!(root.len(), 1);
        assert_eq!(root[0].matched, "target");
        assert_eq!(root[0].page_url, format!("{base}/"));
        assert_eq!(root[0].full_url, Some(format!("{base}/private/x")));
        assert!(report.unvisited.is_empty());
    }

    #[tokio::test]
    async fn test_page_budget_leaves_links_pending() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        html(&mut server, "/", r#"<a href="/one">1</a><a href="/two">2</a>"#).await;

        let report = CrawlEngine::new(CrawlConfig {
            max_pages: 1,
            respect_robots: false,
            ..config(&format!("{base}/"), &["x"])
        })
        .unwrap()
        .run()
        .await;

        assert_eq!(report.counters.pages_attempted, 1);
        let pending: Vec<_> = report.unvisited.iter().map(|u| u.as_str().to_string()).collect();
        assert_eq!(pending, vec![format!("{base}/one"), format!("{base}/two")]);
    }

    #[tokio::test]
    async fn test_delay_runs_between_pages() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        html(&mut server, "/", r#"<a href="/next">next</a>"#).await;
        html(&mut server, "/next", "<p>end</p>").await;

        let delay = Duration::from_millis(400);
        let started = std::time::Instant::now();
        let report = CrawlEngine::new(CrawlConfig {
            delay,
            respect_robots: false,
            ..config(&format!("{base}/"), &["x"])
        })
        .unwrap()
        .run()
        .await;
        let elapsed = started.elapsed();

        // One pause between the two pages, none after the last one
        assert_eq!(report.counters.pages_attempted, 2);
        assert!(elapsed >= delay, "no pause: {elapsed:?}");
        assert!(elapsed < delay * 2, "paused twice: {elapsed:?}");
    }

    #[tokio::test]
    async fn test_no_delay_when_queue_empty_or_budget_spent() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        html(&mut server, "/", r#"<a href="/next">next</a>"#).await;
        html(&mut server, "/lonely", "<p>no links</p>").await;

        let delay = Duration::from_secs(3);

        // Budget of one page: /next stays queued but nothing sleeps
        let started = std::time::Instant::now();
        let report = CrawlEngine::new(CrawlConfig {
            delay,
            max_pages: 1,
            respect_robots: false,
            ..config(&format!("{base}/"), &["x"])
        })
        .unwrap()
        .run()
        .await;
        assert_eq!(report.unvisited.len(), 1);
        assert!(started.elapsed() < delay);

        // Single page with no links: the queue is empty after it
        let started = std::time::Instant::now();
        let report = CrawlEngine::new(CrawlConfig {
            delay,
            respect_robots: false,
            ..config(&format!("{base}/lonely"), &["x"])
        })
        .unwrap()
        .run()
        .await;
        assert_eq!(report.counters.pages_attempted, 1);
        assert!(started.elapsed() < delay);
    }

    #[tokio::test]
    async fn test_failed_fetch_counts_toward_budget() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        server
            .mock("GET", "/")
            .with_status(500)
            .with_header("content-type", "text/html")
            .with_body("target <a href=\"/next\">next</a>")
            .create_async()
            .await;

        let report = CrawlEngine::new(CrawlConfig {
            respect_robots: false,
            ..config(&format!("{base}/"), &["target"])
        })
        .unwrap()
        .run()
        .await;

        assert_eq!(report.counters.pages_attempted, 1);
        assert_eq!(report.counters.pages_failed, 1);
        assert!(report.mapping.is_empty());
        assert!(report.unvisited.is_empty());
    }

    #[tokio::test]
    async fn test_pages_are_visited_breadth_first() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        html(&mut server, "/", r#"target <a href="/a">a</a> <a href="/b">b</a>"#).await;
        html(&mut server, "/a", r#"target <a href="/c">c</a>"#).await;
        html(&mut server, "/b", r#"target <a href="/d">d</a> <a href="/a">a</a>"#).await;
        html(&mut server, "/c", "target").await;
        html(&mut server, "/d", "target").await;

        let report = CrawlEngine::new(CrawlConfig {
            respect_robots: false,
            ..config(&format!("{base}/"), &["target"])
        })
        .unwrap()
        .run()
        .await;

        let order: Vec<_> = report
            .mapping
            .get("/")
            .unwrap()
            .iter()
            .map(|f| f.page_url.trim_start_matches(base.as_str()).to_string())
            .collect();
        assert_eq!(order, vec!["/", "/a", "/b", "/c", "/d"]);
        assert_eq!(report.counters.pages_attempted, 5);
    }

    #[tokio::test]
    async fn test_links_are_deduplicated_and_filtered() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        html(
            &mut server,
            "/",
            r##"<a href="/a#one">1</a>
                <a href="/a#two">2</a>
                <a href="#top">top</a>
                <a href="mailto:me@a.test">mail</a>
                <a href="http://other.test/x">away</a>"##,
        )
        .await;

        let report = CrawlEngine::new(CrawlConfig {
            max_pages: 1,
            respect_robots: false,
            ..config(&format!("{base}/"), &["x"])
        })
        .unwrap()
        .run()
        .await;

        let pending: Vec<_> = report.unvisited.iter().map(|u| u.as_str().to_string()).collect();
        assert_eq!(pending, vec![format!("{base}/a")]);
        assert_eq!(report.counters.links_enqueued, 1);
    }

    #[tokio::test]
    async fn test_all_hosts_keeps_foreign_links() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        html(&mut server, "/", r#"<a href="http://other.test/x">away</a>"#).await;

        let report = CrawlEngine::new(CrawlConfig {
            max_pages: 1,
            same_host_only: false,
            respect_robots: false,
            ..config(&format!("{base}/"), &["x"])
        })
        .unwrap()
        .run()
        .await;

        assert_eq!(report.unvisited.len(), 1);
        assert_eq!(report.unvisited[0].as_str(), "http://other.test/x");
    }

    #[tokio::test]
    async fn test_findings_grouped_by_folder() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        html(&mut server, "/", r#"<a href="/blog/post.html">blog</a>"#).await;
        html(&mut server, "/blog/post.html", "a Widget and a widget").await;

        let report = CrawlEngine::new(CrawlConfig {
            respect_robots: false,
            ..config(&format!("{base}/"), &["widget"])
        })
        .unwrap()
        .run()
        .await;

        assert!(report.mapping.get("/").is_none());
        let blog = report.mapping.get("/blog/").unwrap();
        let matched: Vec<_> = blog.iter().map(|f| f.matched.as_str()).collect();
        assert_eq!(matched, vec!["Widget", "widget"]);
    }

    #[tokio::test]
    async fn test_crawl_site_persists_mapping() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        html(&mut server, "/", "the target").await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");

        let report = crawl_site(CrawlConfig {
            respect_robots: false,
            output: output.clone(),
            ..config(&format!("{base}/"), &["target"])
        })
        .await
        .unwrap();

        assert_eq!(report.counters.findings, 1);
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["/"][0]["match"], "target");
        assert!(written["/"][0]["full_url"].is_null());
    }
}
