//! Hardware collaborator abstractions for the tapguard access controller.
//!
//! The access-control core talks to five external drivers, each behind a
//! small trait so mock implementations (for development and testing) and
//! real drivers can be swapped freely:
//!
//! - [`CredentialReader`]: non-blocking RFID poll yielding a 4-byte credential
//! - [`ByteStore`]: byte-addressable non-volatile memory (EEPROM-like)
//! - [`Indicator`]: RGB status light
//! - [`AudioDevice`]: buzzer playing named tone patterns
//! - [`LockActuator`]: door lock engage/release
//!
//! # Design
//!
//! - **Synchronous**: the control loop is cooperative and single-threaded.
//!   Polling the reader returns immediately; indicator and audio drivers may
//!   block, which is their own concern.
//! - **Object-safe**: every trait can be used as `Box<dyn Trait>`.
//! - **Error-aware**: all operations return [`Result<T>`][error::Result]
//!   with a [`HardwareError`].
//!
//! # Examples
//!
//! ```
//! use tapguard_core::CredentialId;
//! use tapguard_hardware::mock::MockReader;
//! use tapguard_hardware::CredentialReader;
//!
//! let (mut reader, handle) = MockReader::new();
//! assert_eq!(reader.poll_for_credential().unwrap(), None);
//!
//! let card = CredentialId::new([0xAA, 0xBB, 0xCC, 0xDD]);
//! handle.try_present(card).unwrap();
//! assert_eq!(reader.poll_for_credential().unwrap(), Some(card));
//! ```

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{AudioDevice, ByteStore, CredentialReader, Indicator, LockActuator};
pub use types::{LedColor, ToneStep, TonePattern};
