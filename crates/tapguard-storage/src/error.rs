use tapguard_hardware::HardwareError;
use thiserror::Error;

/// Credential store error types.
///
/// A corrupt count byte is deliberately absent: `CredentialStore::load`
/// recovers from it by resetting to an empty store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store already holds the maximum number of credentials
    #[error("Credential store full ({capacity} entries)")]
    CapacityExceeded { capacity: usize },

    /// `remove_at` called with an index that does not exist
    #[error("Index {index} out of range (store holds {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The byte store cannot hold a full credential image
    #[error("Byte store too small: need {required} bytes, device has {available}")]
    DeviceTooSmall { required: usize, available: usize },

    /// The underlying byte store failed
    #[error("Byte store error: {0}")]
    Hardware(#[from] HardwareError),
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
