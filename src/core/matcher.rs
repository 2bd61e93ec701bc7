//! Include/exclude filtering of scanned paths.

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

/// Path filter compiled from the configured include/exclude globs.
///
/// Patterns are matched against relative `/`-separated paths. `*` and `?`
/// stay within one path segment; `**` crosses segments.
#[derive(Debug, Clone)]
pub struct ScanMatcher {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid glob pattern: \"{}\"", p)))
        .collect()
}

impl ScanMatcher {
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            includes: compile(includes)?,
            excludes: compile(excludes)?,
        })
    }

    /// Empty includes admit every path; any matching exclude rejects.
    pub fn matches(&self, relative_path: &str) -> bool {
        let included = self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|p| p.matches_with(relative_path, MATCH_OPTIONS));
        if !included {
            return false;
        }
        !self
            .excludes
            .iter()
            .any(|p| p.matches_with(relative_path, MATCH_OPTIONS))
    }
}
