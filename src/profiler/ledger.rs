// src/profiler/ledger.rs
// =============================================================================
// The timing ledger: total time spent in each profiled method.
//
// Entries are keyed by (implementation type, method signature). The first
// recorded call creates the entry; later calls add to it. Entries are never
// removed, so every total only grows during a run.
//
// Many crawl tasks record into the same ledger at once, so it is backed by a
// DashMap and each record is a single entry update.
// =============================================================================

use dashmap::DashMap;
use std::time::Duration;

/// Identifies one profiled method on one concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimingKey {
    /// Type name of the wrapped implementation, e.g. `link_crawler::parser::HttpPageParser`
    pub implementation: &'static str,
    /// Signature of the profiled method
    pub operation: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TimingEntry {
    total: Duration,
    calls: u64,
}

/// One row of a ledger snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingRecord {
    pub key: TimingKey,
    pub total: Duration,
    pub calls: u64,
}

#[derive(Debug, Default)]
pub struct TimingLedger {
    entries: DashMap<TimingKey, TimingEntry>,
}

impl TimingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed` to the entry for `key`, creating it if needed.
    pub fn record(&self, key: TimingKey, elapsed: Duration) {
        let mut entry = self.entries.entry(key).or_default();
        entry.total += elapsed;
        entry.calls += 1;
    }

    /// A copy of every entry, slowest first.
    pub fn snapshot(&self) -> Vec<TimingRecord> {
        let mut records: Vec<TimingRecord> = self
            .entries
            .iter()
            .map(|entry| TimingRecord {
                key: *entry.key(),
                total: entry.total,
                calls: entry.calls,
            })
            .collect();

        records.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
        records
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
