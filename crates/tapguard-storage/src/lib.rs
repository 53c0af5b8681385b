//! Credential persistence for the tapguard access controller.
//!
//! The authorized credential list lives in a small byte-addressable
//! non-volatile store. The on-device layout is fixed:
//!
//! | Address            | Content                              |
//! |--------------------|--------------------------------------|
//! | `0`                | entry count `N` (`0..=20`)           |
//! | `1 + 4*i ..+4`     | bytes of entry `i`, for `i < N`      |
//!
//! Bytes past the last entry are ignored on load and never cleared on
//! removal.
//!
//! # Components
//!
//! - [`CredentialStore`]: ordered, bounded list with load/save over any
//!   [`ByteStore`](tapguard_hardware::ByteStore)
//! - [`FileByteStore`]: file-backed image used by the command-line runner

pub mod credential_store;
pub mod error;
pub mod file;

pub use credential_store::CredentialStore;
pub use error::{StorageError, StorageResult};
pub use file::{DEFAULT_IMAGE_SIZE, FileByteStore};
