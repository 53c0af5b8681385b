//! Driver failures.
//!
//! Drivers report a lost device, an address past the end of a byte store,
//! a rejected transfer, or an underlying I/O error.

/// Result alias used by every driver trait.
pub type Result<T> = std::result::Result<T, HardwareError>;

#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The device went away; `device` names it.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// A byte store was addressed past its last byte.
    #[error("Address {addr} out of range (capacity {capacity} bytes)")]
    AddressOutOfRange { addr: usize, capacity: usize },

    /// The device is present but refused or garbled a transfer.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn address_out_of_range(addr: usize, capacity: usize) -> Self {
        Self::AddressOutOfRange { addr, capacity }
    }

    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }
}
