//! In-memory byte store emulating an EEPROM.

use super::lock_state;
use crate::{HardwareError, Result, traits::ByteStore};
use std::sync::{Arc, Mutex};
use tapguard_core::constants::ERASED_BYTE;

/// RAM-backed [`ByteStore`].
///
/// A fresh store reads back as erased (`0xFF`) memory. Clones share the
/// same bytes, which lets a test simulate a power cycle by loading a second
/// credential store from a clone of the first one's device.
///
/// # Examples
///
/// ```
/// use tapguard_hardware::ByteStore;
/// use tapguard_hardware::mock::MemoryByteStore;
///
/// let mut store = MemoryByteStore::new(16);
/// assert_eq!(store.read_byte(0).unwrap(), 0xFF);
///
/// store.write_byte(0, 3).unwrap();
/// assert_eq!(store.read_byte(0).unwrap(), 3);
/// assert!(store.write_byte(16, 0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryByteStore {
    bytes: Arc<Mutex<Vec<u8>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryByteStore {
    /// Create an erased store of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self::from_bytes(vec![ERASED_BYTE; capacity])
    }

    /// Create a store holding `bytes` verbatim.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(bytes)),
            writes: Arc::new(Mutex::new(0)),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<u8> {
        lock_state(&self.bytes).clone()
    }

    /// Total number of `write_byte` calls seen by any clone.
    pub fn write_count(&self) -> usize {
        *lock_state(&self.writes)
    }
}

impl ByteStore for MemoryByteStore {
    fn capacity(&self) -> usize {
        lock_state(&self.bytes).len()
    }

    fn read_byte(&self, addr: usize) -> Result<u8> {
        let bytes = lock_state(&self.bytes);
        bytes
            .get(addr)
            .copied()
            .ok_or_else(|| HardwareError::address_out_of_range(addr, bytes.len()))
    }

    fn write_byte(&mut self, addr: usize, value: u8) -> Result<()> {
        let mut bytes = lock_state(&self.bytes);
        let capacity = bytes.len();
        let slot = bytes
            .get_mut(addr)
            .ok_or_else(|| HardwareError::address_out_of_range(addr, capacity))?;
        *slot = value;
        *lock_state(&self.writes) += 1;
        Ok(())
    }
}
