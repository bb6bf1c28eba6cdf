// src/fetch/mod.rs
// =============================================================================
// Network access:
// - http: the page fetcher (redirects, content-type filter, timeout)
// - robots: robots.txt loading and allow/deny checks
// =============================================================================

mod http;
mod robots;

pub use http::{Fetcher, MAX_REDIRECTS};
pub use robots::{load as load_robots, RobotsRuleset};
