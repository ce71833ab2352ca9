// src/crawl/result.rs
// =============================================================================
// What a finished crawl hands back, and how it is ranked for reporting.
// =============================================================================

use serde::{Serialize, Serializer};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

/// A copy of a crawl's state, taken after every task has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    /// Word -> total count across every successfully parsed page
    pub word_counts: HashMap<String, u64>,
    /// Every location that was claimed, including pages that failed to parse
    pub visited: BTreeSet<String>,
}

impl CrawlResult {
    pub fn urls_visited(&self) -> usize {
        self.visited.len()
    }

    /// The report written to stdout or the result file: the `top` most
    /// popular words and the number of URLs visited.
    pub fn report(&self, top: usize) -> CrawlReport {
        CrawlReport {
            word_counts: RankedWords(popular_words(&self.word_counts, top)),
            urls_visited: self.urls_visited(),
        }
    }
}

// Ranks words: most frequent first, then longer words first, then A-Z
pub fn popular_words(counts: &HashMap<String, u64>, top: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(&String, &u64)> = counts.iter().collect();
    ranked.sort_by_key(|(word, count)| (Reverse(**count), Reverse(word.len()), *word));
    ranked
        .into_iter()
        .take(top)
        .map(|(word, count)| (word.clone(), *count))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    pub word_counts: RankedWords,
    pub urls_visited: usize,
}

/// Words in rank order. Serializes as a JSON object that keeps that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedWords(pub Vec<(String, u64)>);

impl Serialize for RankedWords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(word, count)| (word, count)))
    }
}
