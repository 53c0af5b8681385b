//! Persistent, bounded list of authorized credentials.
//!
//! # Persistence
//!
//! Every mutation rewrites the whole image synchronously: the count byte at
//! address 0 followed by each 4-byte identifier in storage order. There is
//! no checksum and no write batching. A power loss in the middle of a save
//! can leave a torn image; that risk is accepted, not detected.
//!
//! # Examples
//!
//! ```
//! use tapguard_core::CredentialId;
//! use tapguard_hardware::mock::MemoryByteStore;
//! use tapguard_storage::CredentialStore;
//!
//! # fn main() -> tapguard_storage::StorageResult<()> {
//! let device = MemoryByteStore::new(128);
//! let mut store = CredentialStore::load(device.clone())?;
//! assert!(store.is_empty());
//!
//! let card = CredentialId::new([0xAA, 0xBB, 0xCC, 0xDD]);
//! store.add(card)?;
//!
//! // A second load sees what the first one persisted.
//! let reloaded = CredentialStore::load(device)?;
//! assert_eq!(reloaded.index_of(&card), Some(0));
//! # Ok(())
//! # }
//! ```

use tapguard_core::CredentialId;
use tapguard_core::constants::{
    CREDENTIAL_LENGTH, MAX_CARDS, STORE_COUNT_ADDR, STORE_DATA_ADDR, store_image_len,
};
use tapguard_hardware::ByteStore;
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};

/// Ordered, bounded collection of authorized credentials backed by a
/// [`ByteStore`].
///
/// Insertion order is preserved and removal closes the gap. The store does
/// not reject duplicates itself; callers check [`contains`](Self::contains)
/// before adding.
#[derive(Debug)]
pub struct CredentialStore<S> {
    device: S,
    entries: Vec<CredentialId>,
}

impl<S: ByteStore> CredentialStore<S> {
    /// Hydrate the store from `device`.
    ///
    /// A count byte outside `0..=MAX_CARDS` marks the image as
    /// uninitialized: the store starts empty and the empty image is written
    /// back. This never fails the boot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DeviceTooSmall` if the device cannot hold a
    /// full image, or `StorageError::Hardware` if a read fails.
    pub fn load(device: S) -> StorageResult<Self> {
        let required = store_image_len(MAX_CARDS);
        if device.capacity() < required {
            return Err(StorageError::DeviceTooSmall {
                required,
                available: device.capacity(),
            });
        }

        let count = usize::from(device.read_byte(STORE_COUNT_ADDR)?);
        if count > MAX_CARDS {
            warn!(
                "Stored credential count {} exceeds {}; treating store as uninitialized",
                count, MAX_CARDS
            );
            let mut store = Self {
                device,
                entries: Vec::with_capacity(MAX_CARDS),
            };
            store.save()?;
            return Ok(store);
        }

        let mut entries = Vec::with_capacity(MAX_CARDS);
        for slot in 0..count {
            let base = STORE_DATA_ADDR + slot * CREDENTIAL_LENGTH;
            let mut bytes = [0u8; CREDENTIAL_LENGTH];
            for (offset, byte) in bytes.iter_mut().enumerate() {
                *byte = device.read_byte(base + offset)?;
            }
            entries.push(CredentialId::new(bytes));
        }

        debug!("Loaded {} credential(s) from byte store", entries.len());
        Ok(Self { device, entries })
    }

    /// Write the full image: count byte, then every identifier in order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Hardware` if a write fails; earlier writes are
    /// not rolled back.
    pub fn save(&mut self) -> StorageResult<()> {
        // Bounded by MAX_CARDS, which fits in a byte.
        let count = self.entries.len() as u8;
        self.device.write_byte(STORE_COUNT_ADDR, count)?;

        for (slot, id) in self.entries.iter().enumerate() {
            let base = STORE_DATA_ADDR + slot * CREDENTIAL_LENGTH;
            for (offset, byte) in id.as_bytes().iter().enumerate() {
                self.device.write_byte(base + offset, *byte)?;
            }
        }
        Ok(())
    }

    /// Byte-wise linear scan for `id`.
    pub fn contains(&self, id: &CredentialId) -> bool {
        self.index_of(id).is_some()
    }

    /// Position of the first entry equal to `id`.
    pub fn index_of(&self, id: &CredentialId) -> Option<usize> {
        self.entries.iter().position(|entry| entry == id)
    }

    /// Append `id` and persist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::CapacityExceeded` if the store already holds
    /// `MAX_CARDS` entries; nothing is written in that case.
    pub fn add(&mut self, id: CredentialId) -> StorageResult<()> {
        if self.is_full() {
            return Err(StorageError::CapacityExceeded {
                capacity: MAX_CARDS,
            });
        }
        self.entries.push(id);
        self.save()
    }

    /// Remove the entry at `index`, shifting later entries left, and persist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::IndexOutOfRange` if `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> StorageResult<CredentialId> {
        if index >= self.entries.len() {
            return Err(StorageError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.save()?;
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_CARDS
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        MAX_CARDS
    }

    /// Stored identifiers in storage order.
    pub fn as_slice(&self) -> &[CredentialId] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CredentialId> {
        self.entries.iter()
    }

    /// Borrow the backing device.
    pub fn device(&self) -> &S {
        &self.device
    }
}
