//! Mock device implementations for testing and development.
//!
//! These devices can be driven and inspected programmatically without
//! physical hardware. Output mocks are cheap to clone and every clone
//! observes the same recorded state, so a test can keep one copy while the
//! control loop owns another.

pub mod audio;
pub mod byte_store;
pub mod indicator;
pub mod lock;
pub mod reader;

// Re-export commonly used types
pub use audio::MockAudio;
pub use byte_store::MemoryByteStore;
pub use indicator::MockIndicator;
pub use lock::MockLock;
pub use reader::{MockReader, MockReaderHandle};

use std::sync::{Mutex, MutexGuard};

/// Lock a mock's shared state. A panicking test thread cannot leave the
/// recorded data half-written, so poisoning is ignored.
fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
