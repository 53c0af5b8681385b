//! Monotonic millisecond clocks.
//!
//! The access controller never reads time itself; callers pass `now_ms`
//! explicitly. Only the control loop owns a [`Clock`], which lets tests
//! drive every timeout with a [`ManualClock`] instead of real delays.
//!
//! # Examples
//!
//! ```
//! use tapguard_core::{Clock, ManualClock};
//!
//! let clock = ManualClock::new();
//! let observer = clock.clone();
//!
//! clock.advance(2_999);
//! assert_eq!(observer.now_ms(), 2_999);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Source of monotonic time in milliseconds.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary, fixed origin.
    fn now_ms(&self) -> u64;
}

/// Wall-clock backed clock, measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Manually driven clock for tests and simulations.
///
/// Clones share the same counter, so a test can keep one handle while the
/// control loop owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at `start_ms`.
    pub fn starting_at(start_ms: u64) -> Self {
        let clock = Self::new();
        clock.set(start_ms);
        clock
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    /// Move the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
