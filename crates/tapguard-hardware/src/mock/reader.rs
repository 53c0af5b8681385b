//! Mock RFID reader implementation for testing and development.
//!
//! The reader side is polled without blocking; the handle side presents
//! credentials from a test or a simulation front end (such as stdin).

use crate::{HardwareError, Result, traits::CredentialReader};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tapguard_core::CredentialId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Capacity of the presentation queue between handle and reader.
const QUEUE_DEPTH: usize = 32;

/// Mock RFID reader for testing and development.
///
/// # Examples
///
/// ```
/// use tapguard_core::CredentialId;
/// use tapguard_hardware::mock::MockReader;
/// use tapguard_hardware::CredentialReader;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> tapguard_hardware::Result<()> {
///     let (mut reader, handle) = MockReader::new();
///
///     let card = CredentialId::new([0x04, 0xAB, 0xCD, 0xEF]);
///     handle.present(card).await?;
///
///     assert_eq!(reader.poll_for_credential()?, Some(card));
///     reader.release_session()?;
///     assert_eq!(handle.sessions_released(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReader {
    /// Channel receiver for presented credentials
    event_rx: mpsc::Receiver<CredentialId>,

    /// Device name
    name: String,

    /// Number of completed read sessions
    released: Arc<AtomicUsize>,
}

impl MockReader {
    /// Create a new mock reader with the default name.
    ///
    /// Returns a tuple of (MockReader, MockReaderHandle) where the handle
    /// can be used to simulate card presentations.
    pub fn new() -> (Self, MockReaderHandle) {
        Self::with_name("Mock RFID Reader".to_string())
    }

    /// Create a new mock reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockReaderHandle) {
        let (event_tx, event_rx) = mpsc::channel(QUEUE_DEPTH);
        let released = Arc::new(AtomicUsize::new(0));

        let reader = Self {
            event_rx,
            name: name.clone(),
            released: Arc::clone(&released),
        };

        let handle = MockReaderHandle {
            event_tx,
            name,
            released,
        };

        (reader, handle)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CredentialReader for MockReader {
    fn poll_for_credential(&mut self) -> Result<Option<CredentialId>> {
        match self.event_rx.try_recv() {
            Ok(id) => Ok(Some(id)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(HardwareError::disconnected(format!(
                "{}: presentation channel closed",
                self.name
            ))),
        }
    }

    fn release_session(&mut self) -> Result<()> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Handle for presenting credentials to a [`MockReader`].
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    /// Channel sender for presented credentials
    event_tx: mpsc::Sender<CredentialId>,

    /// Device name
    name: String,

    /// Number of completed read sessions
    released: Arc<AtomicUsize>,
}

impl MockReaderHandle {
    /// Present a credential, waiting for queue space if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present(&self, id: CredentialId) -> Result<()> {
        self.event_tx
            .send(id)
            .await
            .map_err(|_| HardwareError::disconnected(format!("{}: reader dropped", self.name)))
    }

    /// Present a credential without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue is full or the reader has been dropped.
    pub fn try_present(&self, id: CredentialId) -> Result<()> {
        self.event_tx.try_send(id).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                HardwareError::communication(format!("{}: presentation queue full", self.name))
            }
            mpsc::error::TrySendError::Closed(_) => {
                HardwareError::disconnected(format!("{}: reader dropped", self.name))
            }
        })
    }

    /// Number of read sessions the reader has released.
    pub fn sessions_released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
