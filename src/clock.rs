// src/clock.rs
// =============================================================================
// This module provides the time source used by the crawler and the profiler.
//
// Everything that asks "what time is it?" goes through the Clock trait, so
// tests can swap in a clock they control:
// - SystemClock: the real monotonic clock (std::time::Instant)
// - FakeClock: a test clock that only moves when told to
//
// Rust concepts:
// - Traits: Shared behaviour behind a common interface
// - Send + Sync: The clock is shared across worker threads
// =============================================================================

use std::time::Instant;

/// A source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
pub use fake::FakeClock;
