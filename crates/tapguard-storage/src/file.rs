//! File-backed EEPROM image.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tapguard_core::constants::ERASED_BYTE;
use tapguard_hardware::{ByteStore, HardwareError};
use tracing::info;

/// Size of a freshly created image file, matching a small AVR EEPROM.
pub const DEFAULT_IMAGE_SIZE: usize = 512;

/// [`ByteStore`] persisted to a fixed-size file on disk.
///
/// The whole image is mirrored in memory for reads. Each write updates the
/// mirror and the single affected byte in the file, then flushes, so the
/// file survives a process restart the way an EEPROM survives a power
/// cycle.
#[derive(Debug)]
pub struct FileByteStore {
    path: PathBuf,
    file: File,
    image: Vec<u8>,
}

impl FileByteStore {
    /// Open the image at `path`, creating an erased file of
    /// [`DEFAULT_IMAGE_SIZE`] bytes if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HardwareError> {
        Self::open_with_size(path, DEFAULT_IMAGE_SIZE)
    }

    /// Open or create the image at `path` with a capacity of `size` bytes.
    ///
    /// An existing file shorter than `size` is padded with erased bytes;
    /// a longer one keeps its full length.
    pub fn open_with_size(path: impl AsRef<Path>, size: usize) -> Result<Self, HardwareError> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let mut image = Vec::with_capacity(size);
        file.read_to_end(&mut image)?;

        if image.len() < size {
            let existing = image.len();
            image.resize(size, ERASED_BYTE);
            file.seek(SeekFrom::Start(existing as u64))?;
            file.write_all(&image[existing..])?;
            file.sync_all()?;
            if existing == 0 {
                info!("Created erased byte store image at {}", path.display());
            }
        }

        Ok(Self { path, file, image })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteStore for FileByteStore {
    fn capacity(&self) -> usize {
        self.image.len()
    }

    fn read_byte(&self, addr: usize) -> Result<u8, HardwareError> {
        self.image
            .get(addr)
            .copied()
            .ok_or_else(|| HardwareError::address_out_of_range(addr, self.image.len()))
    }

    fn write_byte(&mut self, addr: usize, value: u8) -> Result<(), HardwareError> {
        let capacity = self.image.len();
        let slot = self
            .image
            .get_mut(addr)
            .ok_or_else(|| HardwareError::address_out_of_range(addr, capacity))?;
        *slot = value;

        self.file.seek(SeekFrom::Start(addr as u64))?;
        self.file.write_all(&[value])?;
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_erased_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.bin");

        let store = FileByteStore::open(&path).unwrap();

        assert_eq!(store.capacity(), DEFAULT_IMAGE_SIZE);
        assert_eq!(store.read_byte(0).unwrap(), ERASED_BYTE);
        assert_eq!(std::fs::read(&path).unwrap().len(), DEFAULT_IMAGE_SIZE);
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.bin");

        {
            let mut store = FileByteStore::open_with_size(&path, 64).unwrap();
            store.write_byte(0, 2).unwrap();
            store.write_byte(63, 0x42).unwrap();
        }

        let store = FileByteStore::open_with_size(&path, 64).unwrap();
        assert_eq!(store.read_byte(0).unwrap(), 2);
        assert_eq!(store.read_byte(63).unwrap(), 0x42);
        assert_eq!(store.read_byte(1).unwrap(), ERASED_BYTE);
    }

    #[test]
    fn test_short_file_is_padded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.bin");
        std::fs::write(&path, [5u8, 1, 2]).unwrap();

        let store = FileByteStore::open_with_size(&path, 16).unwrap();

        assert_eq!(store.capacity(), 16);
        assert_eq!(store.read_byte(0).unwrap(), 5);
        assert_eq!(store.read_byte(3).unwrap(), ERASED_BYTE);
    }

    #[test]
    fn test_out_of_range_access() {
        let dir = TempDir::new().unwrap();
        let mut store = FileByteStore::open_with_size(dir.path().join("s.bin"), 8).unwrap();

        assert!(matches!(
            store.read_byte(8),
            Err(HardwareError::AddressOutOfRange { addr: 8, capacity: 8 })
        ));
        assert!(store.write_byte(100, 0).is_err());
    }
}
