//! Capacity, layout and timing constants for the access-control core.
//!
//! These values define the behaviour every deployment shares: how many
//! credentials fit in the store, how the store image is laid out in the
//! byte store, and the timing windows of the master-credential protocol.
//!
//! # Store Layout
//!
//! ```text
//! addr 0          count (0..=MAX_CARDS)
//! addr 1..=4      credential #0
//! addr 5..=8      credential #1
//! ...
//! ```
//!
//! A count byte outside `0..=MAX_CARDS` marks an uninitialized (or corrupt)
//! image, which is recovered as an empty store.
//!
//! # Usage
//!
//! ```
//! use tapguard_core::constants::*;
//!
//! assert_eq!(store_image_len(MAX_CARDS), 81);
//! assert!(DOUBLE_TAP_WINDOW_MS < WINDOW_TIMEOUT_MS);
//! ```

// ============================================================================
// Credentials
// ============================================================================

/// Length of a credential identifier in bytes.
pub const CREDENTIAL_LENGTH: usize = 4;

/// Maximum number of authorized credentials the store can hold.
pub const MAX_CARDS: usize = 20;

// ============================================================================
// Store Layout
// ============================================================================

/// Address of the count byte.
pub const STORE_COUNT_ADDR: usize = 0;

/// Address of the first credential byte.
pub const STORE_DATA_ADDR: usize = 1;

/// Number of bytes a store image with `count` credentials occupies.
///
/// # Examples
///
/// ```
/// use tapguard_core::constants::store_image_len;
///
/// assert_eq!(store_image_len(0), 1);
/// assert_eq!(store_image_len(2), 9);
/// ```
pub const fn store_image_len(count: usize) -> usize {
    STORE_DATA_ADDR + count * CREDENTIAL_LENGTH
}

/// Value of a never-written byte in an erased EEPROM image.
pub const ERASED_BYTE: u8 = 0xFF;

// ============================================================================
// Timing
// ============================================================================

/// Maximum gap between two master presentations that still counts as a
/// double-tap. The comparison is strict: a gap of exactly this value is not
/// a double-tap.
pub const DOUBLE_TAP_WINDOW_MS: u64 = 3_000;

/// An enrollment or removal window expires once more than this much time has
/// passed since its last activity.
pub const WINDOW_TIMEOUT_MS: u64 = 5_000;

/// How long an auto-revert indicator color stays visible.
pub const FEEDBACK_REVERT_MS: u64 = 3_000;

/// Period of the indicator flash while removal mode is active.
pub const FLASH_INTERVAL_MS: u64 = 500;

/// Default reader poll period of the control loop.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default time the lock stays released after an access grant.
pub const DEFAULT_UNLOCK_MS: u64 = 3_000;
