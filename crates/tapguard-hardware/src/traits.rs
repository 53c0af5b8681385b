//! Hardware device trait definitions.
//!
//! These traits establish the contract between the access-control core and
//! its external drivers. The core only ever *selects* what to show or play;
//! timing of the playback itself belongs to the driver.

use tapguard_core::CredentialId;

use crate::error::Result;
use crate::types::{LedColor, TonePattern};

/// RFID reader abstraction.
///
/// The reader is polled once per control-loop iteration. Absence of a card
/// is a normal outcome and must return immediately with `Ok(None)`.
///
/// # Examples
///
/// ```
/// use tapguard_hardware::{CredentialReader, Result};
///
/// fn drain<R: CredentialReader>(reader: &mut R) -> Result<usize> {
///     let mut seen = 0;
///     while let Some(_id) = reader.poll_for_credential()? {
///         reader.release_session()?;
///         seen += 1;
///     }
///     Ok(seen)
/// }
/// ```
pub trait CredentialReader: Send {
    /// Return the credential that was just read, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader is disconnected or the transceiver
    /// reports a communication failure.
    fn poll_for_credential(&mut self) -> Result<Option<CredentialId>>;

    /// Release the card session after a read has been handled (halt the
    /// card and stop crypto on real transceivers).
    ///
    /// # Errors
    ///
    /// Returns an error if the transceiver cannot be reached.
    fn release_session(&mut self) -> Result<()>;
}

/// Byte-addressable non-volatile memory.
///
/// No transaction guarantees: a sequence of writes interrupted by power
/// loss leaves whatever bytes were already written.
pub trait ByteStore: Send {
    /// Number of addressable bytes.
    fn capacity(&self) -> usize;

    /// Read the byte at `addr`.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::AddressOutOfRange` if `addr >= capacity()`.
    fn read_byte(&self, addr: usize) -> Result<u8>;

    /// Write `value` at `addr`.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::AddressOutOfRange` if `addr >= capacity()`,
    /// or an I/O error from the backing medium.
    fn write_byte(&mut self, addr: usize, value: u8) -> Result<()>;
}

/// RGB status indicator. The color stays until changed.
pub trait Indicator: Send {
    /// Show `color`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot update the light.
    fn set_color(&mut self, color: LedColor) -> Result<()>;
}

/// Buzzer or speaker playing named tone patterns.
pub trait AudioDevice: Send {
    /// Play `pattern`. Whether this blocks is up to the driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot play the pattern.
    fn play_pattern(&mut self, pattern: TonePattern) -> Result<()>;
}

/// Door lock actuator.
pub trait LockActuator: Send {
    /// Engage (`true`) or release (`false`) the lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator does not respond.
    fn set_engaged(&mut self, engaged: bool) -> Result<()>;
}
