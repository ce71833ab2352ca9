// src/patterns.rs
// =============================================================================
// Pattern lists used to skip things during a crawl.
//
// Two lists use this type:
// - ignored URLs: a location matching any pattern is never visited
// - ignored words: a word matching any pattern is never counted
//
// A pattern must match the WHOLE string, not just part of it. For example
// the pattern "http://example\.com/private.*" matches
// "http://example.com/private/a" but "private" on its own matches nothing
// except the exact string "private".
// =============================================================================

use regex::Regex;

use crate::error::ConfigError;

/// A list of anchored regular expressions.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Regex>,
}

impl PatternList {
    /// Compiles every pattern, failing on the first malformed one.
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                // Anchor so the pattern has to cover the full input
                Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                    ConfigError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// True when any pattern matches the whole of `input`.
    /// An empty list matches nothing.
    pub fn matches(&self, input: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(input))
    }

}
