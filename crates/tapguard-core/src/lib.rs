//! Core types shared by every tapguard crate.
//!
//! This crate holds the credential identifier, the common error type, the
//! timing and capacity constants that define the access-control protocol,
//! and the injected [`Clock`] capability used to drive timeouts.

pub mod clock;
pub mod constants;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
