//! Tunable timings for the controller, the feedback presenter and the loop.

use std::time::Duration;

use tapguard_core::CredentialId;
use tapguard_core::constants::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_UNLOCK_MS, DOUBLE_TAP_WINDOW_MS, FEEDBACK_REVERT_MS,
    FLASH_INTERVAL_MS, WINDOW_TIMEOUT_MS,
};

/// Access controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// The credential allowed to open enrollment and removal windows
    pub master: CredentialId,

    /// Maximum gap between two master scans that still counts as a double tap
    pub double_tap_window: Duration,

    /// Inactivity after which an enrollment or removal window closes
    pub window_timeout: Duration,

    /// Period of the removal-mode indicator flash
    pub flash_interval: Duration,
}

impl ControllerConfig {
    /// Create a configuration for `master` with the default timings
    pub fn new(master: CredentialId) -> Self {
        Self {
            master,
            double_tap_window: Duration::from_millis(DOUBLE_TAP_WINDOW_MS),
            window_timeout: Duration::from_millis(WINDOW_TIMEOUT_MS),
            flash_interval: Duration::from_millis(FLASH_INTERVAL_MS),
        }
    }

    /// Set the double-tap window
    pub fn double_tap_window(mut self, window: Duration) -> Self {
        self.double_tap_window = window;
        self
    }

    /// Set the enrollment/removal window timeout
    pub fn window_timeout(mut self, timeout: Duration) -> Self {
        self.window_timeout = timeout;
        self
    }

    /// Set the removal-mode flash period
    pub fn flash_interval(mut self, interval: Duration) -> Self {
        self.flash_interval = interval;
        self
    }
}

/// Feedback presenter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterConfig {
    /// How long an auto-revert color stays before the sticky color returns
    pub revert_after: Duration,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            revert_after: Duration::from_millis(FEEDBACK_REVERT_MS),
        }
    }
}

impl PresenterConfig {
    pub fn revert_after(mut self, duration: Duration) -> Self {
        self.revert_after = duration;
        self
    }
}

/// Control loop configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Delay between reader polls
    pub poll_interval: Duration,

    /// How long the door stays unlocked after access is granted
    pub unlock_duration: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            unlock_duration: Duration::from_millis(DEFAULT_UNLOCK_MS),
        }
    }
}

impl LoopConfig {
    /// Set the reader poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the momentary unlock duration
    pub fn unlock_duration(mut self, duration: Duration) -> Self {
        self.unlock_duration = duration;
        self
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
