// src/pattern/mod.rs
// =============================================================================
// This module turns the user's raw patterns into compiled matchers.
//
// Two kinds of pattern:
// - "/works/"  -> a regular expression (the text between the slashes)
// - "foo.bar"  -> a literal; the dot means a dot, not "any character"
//
// Both kinds are compiled into a case-insensitive regex::Regex, so finding
// every occurrence works the same way no matter which kind it is.
//
// Rust concepts:
// - Enums with data: Pattern::Literal / Pattern::Regex carry their source
// - Iterators: occurrences() lazily yields matches
// =============================================================================

use crate::error::PatternCompileError;
use regex::{Regex, RegexBuilder};

/// The source form a pattern came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    Literal(String),
    Regex(String),
}

/// A compiled, case-insensitive matcher.
#[derive(Debug, Clone)]
pub struct Pattern {
    kind: PatternKind,
    matcher: Regex,
}

/// One match: byte offset into the searched text plus the matched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'t> {
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
}

impl Pattern {
    // Parses a single raw pattern
    //
    // Examples:
    //   "/art(work)?s/" -> Regex("art(work)?s")
    //   "foo.bar"       -> Literal("foo.bar"), compiled as "foo\.bar"
    //   "//"            -> Literal("//") (too short to be a regex)
    pub fn compile(raw: &str) -> Result<Self, PatternCompileError> {
        let (kind, source) = if raw.len() > 2 && raw.starts_with('/') && raw.ends_with('/') {
            let inner = &raw[1..raw.len() - 1];
            (PatternKind::Regex(inner.to_string()), inner.to_string())
        } else {
            (PatternKind::Literal(raw.to_string()), regex::escape(raw))
        };

        let matcher = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternCompileError {
                pattern: raw.to_string(),
                source,
            })?;

        Ok(Self { kind, matcher })
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    /// All non-overlapping occurrences in `text`, left to right.
    pub fn occurrences<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Occurrence<'a>> + 'a {
        self.matcher.find_iter(text).map(|m| Occurrence {
            start: m.start(),
            end: m.end(),
            text: m.as_str(),
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

// Compiles every raw pattern, stopping at the first bad one
pub fn compile(raw_patterns: &[String]) -> Result<Vec<Pattern>, PatternCompileError> {
    raw_patterns.iter().map(|raw| Pattern::compile(raw)).collect()
}
