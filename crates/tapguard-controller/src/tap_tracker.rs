//! Master credential double-tap detection.
//!
//! The detector only counts consecutive master scans. What a count of two
//! or more means is decided by the access controller.

/// Next consecutive-tap count for a master scan at `now_ms`.
///
/// The count grows when the previous scan happened strictly less than
/// `window_ms` ago and restarts at 1 otherwise, including when there was
/// no previous scan.
///
/// # Examples
///
/// ```
/// use tapguard_controller::tap_tracker::next_tap_count;
///
/// assert_eq!(next_tap_count(1_000, None, 0, 3_000), 1);
/// assert_eq!(next_tap_count(3_999, Some(1_000), 1, 3_000), 2);
/// assert_eq!(next_tap_count(4_000, Some(1_000), 1, 3_000), 1);
/// ```
pub fn next_tap_count(
    now_ms: u64,
    last_scan_ms: Option<u64>,
    last_count: u32,
    window_ms: u64,
) -> u32 {
    match last_scan_ms {
        Some(last) if now_ms.saturating_sub(last) < window_ms => last_count.saturating_add(1),
        _ => 1,
    }
}

/// Running state of the double-tap detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterTapTracker {
    window_ms: u64,
    last_scan_ms: Option<u64>,
    count: u32,
}

impl MasterTapTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_scan_ms: None,
            count: 0,
        }
    }

    /// Record a master scan and return the updated consecutive count.
    pub fn register(&mut self, now_ms: u64) -> u32 {
        self.count = next_tap_count(now_ms, self.last_scan_ms, self.count, self.window_ms);
        self.last_scan_ms = Some(now_ms);
        self.count
    }

    /// Drop the accumulated count. The last scan time is kept.
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_scan_ms(&self) -> Option<u64> {
        self.last_scan_ms
    }
}
