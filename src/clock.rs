//! Time sources for the ledger.
//!
//! The ledger never caches time: every expiration check calls [`Clock::now`].
//! - `SystemClock` reads wall time (Unix seconds)
//! - `ManualClock` is a shared, advanceable clock for simulation and tests

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current time as Unix seconds.
///
/// Readings must be monotonically non-decreasing within one execution context.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // A clock set before the epoch reads as 0 rather than failing.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock.
///
/// Clones share the same underlying timestamp, so a test can hold one handle
/// and advance time while the ledger holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at `start` (Unix seconds).
    pub fn new(start: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Create a clock starting at the current wall time.
    pub fn starting_now() -> Self {
        Self::new(SystemClock.now())
    }

    /// Move time forward by `by`. Saturates at `u64::MAX`.
    pub fn advance(&self, by: Duration) -> u64 {
        let secs = by.as_secs();
        let previous = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(secs))
            })
            .unwrap_or_else(|t| t);
        previous.saturating_add(secs)
    }

    /// Jump to `timestamp`. Requests to move backwards are ignored.
    pub fn set(&self, timestamp: u64) -> u64 {
        self.now.fetch_max(timestamp, Ordering::SeqCst).max(timestamp)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
