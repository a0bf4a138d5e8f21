//! Time source for the treasury
//!
//! The engine stamps transactions and log entries with millisecond
//! timestamps taken from an injected `Clock`, so the whole pipeline can be
//! driven deterministically in tests. The coordinator additionally clamps
//! timestamps monotone non-decreasing, so ledger order always equals
//! commit order even if the wall clock steps backwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of millisecond timestamps
pub trait Clock {
    /// Current time, milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven time source for deterministic tests
///
/// Shared between the test and the coordinator (e.g., via `Arc`), so the
/// test can advance time between settlement attempts.
///
/// # Example
/// ```
/// use agent_treasury_core_rs::core::time::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// assert_eq!(clock.now_ms(), 1_000);
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1_500);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a manual clock starting at `start_ms`
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    /// Advance the clock by `ms` milliseconds
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Set the clock to an absolute time
    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
