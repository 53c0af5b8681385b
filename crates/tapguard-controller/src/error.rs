use tapguard_hardware::HardwareError;
use tapguard_storage::StorageError;
use thiserror::Error;

/// Errors that stop the access controller.
///
/// Everything recoverable (a full store, an unknown card) is reported as a
/// feedback event instead; a value of this type means the control loop
/// cannot continue safely.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Persisting or mutating the credential store failed
    #[error("Credential store error: {0}")]
    Storage(#[from] StorageError),

    /// A reader, indicator, audio or lock driver failed
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),
}

/// Specialized result type for controller operations
pub type ControllerResult<T> = Result<T, ControllerError>;
