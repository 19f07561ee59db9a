//! The navigation whitelist: an ordered list of full-match URL regexes.

use regex::Regex;

use crate::config::ConfigError;

/// Compiled whitelist. Each pattern must match the candidate URL in its
/// entirety, so `https://example\.com/.*` does not also admit
/// `http://example.com/...` or `xhttps://example.com/...`.
#[derive(Debug, Clone)]
pub struct Whitelist {
    patterns: Vec<Regex>,
}

impl Whitelist {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(&format!("^(?:{p})$")).map_err(|source| ConfigError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Whitelist { patterns })
    }

    /// True iff some pattern fully matches `url`. An empty whitelist admits
    /// nothing.
    pub fn is_allowed(&self, url: &str) -> bool {
        self.patterns.iter().any(|rx| rx.is_match(url))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
