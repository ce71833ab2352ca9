// src/crawl/state.rs
// =============================================================================
// The two pieces of state every crawl task shares during one crawl:
// - VisitedSet: which locations have already been claimed
// - WordCounts: running word totals across every parsed page
//
// Both are created fresh for each crawl and dropped when it ends, so two
// crawls never see each other's pages or counts.
//
// Rust concepts:
// - DashMap/DashSet: HashMap/HashSet split into shards, each with its own
//   lock, so many threads can update them at once
// - Interior mutability: the methods take &self, not &mut self
// =============================================================================

use dashmap::{DashMap, DashSet};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    /// Claims `url` for the caller.
    ///
    /// Returns true for exactly one caller per url; everyone else gets false.
    pub fn claim(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn snapshot(&self) -> BTreeSet<String> {
        self.urls.iter().map(|url| url.key().clone()).collect()
    }
}

#[derive(Debug, Default)]
pub struct WordCounts {
    counts: DashMap<String, u64>,
}

impl WordCounts {
    /// Adds one page's counts into the totals.
    pub fn merge(&self, page: &HashMap<String, u64>) {
        for (word, count) in page {
            // Each entry update holds only that word's shard lock
            *self.counts.entry(word.clone()).or_insert(0) += count;
        }
    }

    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
