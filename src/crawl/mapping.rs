// src/crawl/mapping.rs
// =============================================================================
// Groups findings by the "folder" part of the page URL and writes the result
// to disk as pretty-printed JSON.
//
// Folder keys:
//   https://site/                -> "/"
//   https://site/blog/           -> "/blog/"
//   https://site/blog/post.html  -> "/blog/"
//
// Output shape:
//   { "/blog/": [ { "page_url": ..., "match": ..., "full_url": ..., "snippet": ... } ] }
// =============================================================================

use crate::error::PersistError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// One occurrence of a pattern on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub page_url: String,
    #[serde(rename = "match")]
    pub matched: String,
    /// Best-effort link associated with the match; may be unrelated
    pub full_url: Option<String>,
    pub snippet: String,
}

// Derives the folder key from a URL
//
// Malformed URLs fall back to "/" so the function never fails
pub fn folder_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => folder_key_for_path(parsed.path()),
        Err(_) => "/".to_string(),
    }
}

fn folder_key_for_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    if path.ends_with('/') {
        return path.to_string();
    }
    match path.rfind('/') {
        Some(idx) => path[..=idx].to_string(),
        None => "/".to_string(),
    }
}

/// Findings keyed by folder, each list in discovery order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FolderMapping {
    folders: BTreeMap<String, Vec<Finding>>,
}

impl FolderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: &str, findings: Vec<Finding>) {
        self.folders.entry(key.to_string()).or_default().extend(findings);
    }

    pub fn get(&self, key: &str) -> Option<&[Finding]> {
        self.folders.get(key).map(Vec::as_slice)
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn finding_count(&self) -> usize {
        self.folders.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

// Writes the whole mapping in one go; nothing is written incrementally
pub fn persist(mapping: &FolderMapping, path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(mapping)?;
    std::fs::write(path, json).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })
}
