//! Shared fixtures for controller integration tests.
//!
//! [`Rig`] assembles a full [`ControlLoop`] from mock drivers and a manual
//! clock, and keeps observer clones of every mock so tests can inspect what
//! the loop did.

#![allow(dead_code)]

use tapguard_controller::{
    AccessController, ControlLoop, ControllerConfig, FeedbackEvent, FeedbackPresenter, LoopConfig,
    PresenterConfig,
};
use tapguard_core::{CredentialId, ManualClock};
use tapguard_hardware::mock::{
    MemoryByteStore, MockAudio, MockIndicator, MockLock, MockReader, MockReaderHandle,
};
use tapguard_storage::CredentialStore;

pub const MASTER: CredentialId = CredentialId::new([0x01, 0x02, 0x03, 0x04]);
pub const CARD: CredentialId = CredentialId::new([0xAA, 0xBB, 0xCC, 0xDD]);

/// Byte store size used by every rig.
pub const DEVICE_SIZE: usize = 128;

pub type MockLoop =
    ControlLoop<MockReader, MemoryByteStore, MockIndicator, MockAudio, MockLock, ManualClock>;

/// Distinct non-master credential numbered `n`.
pub fn card(n: u8) -> CredentialId {
    CredentialId::new([0x5E, 0x00, 0x00, n])
}

pub struct Rig {
    pub control: MockLoop,
    pub reader: MockReaderHandle,
    pub clock: ManualClock,
    pub device: MemoryByteStore,
    pub indicator: MockIndicator,
    pub audio: MockAudio,
    pub lock: MockLock,
}

impl Rig {
    /// A started loop whose store already holds `cards`.
    pub fn with_cards(cards: &[CredentialId]) -> Self {
        let device = MemoryByteStore::new(DEVICE_SIZE);
        {
            let mut store = CredentialStore::load(device.clone()).unwrap();
            for id in cards {
                store.add(*id).unwrap();
            }
        }
        Self::on_device(device)
    }

    /// A started loop over an existing device image.
    pub fn on_device(device: MemoryByteStore) -> Self {
        let store = CredentialStore::load(device.clone()).unwrap();
        let controller = AccessController::new(ControllerConfig::new(MASTER), store);

        let indicator = MockIndicator::new();
        let audio = MockAudio::new();
        let lock = MockLock::new();
        let presenter =
            FeedbackPresenter::new(indicator.clone(), audio.clone(), PresenterConfig::default());

        let (reader, handle) = MockReader::new();
        let clock = ManualClock::new();
        let mut control = ControlLoop::new(
            reader,
            controller,
            presenter,
            lock.clone(),
            clock.clone(),
            LoopConfig::default(),
        );
        control.start().unwrap();

        Self {
            control,
            reader: handle,
            clock,
            device,
            indicator,
            audio,
            lock,
        }
    }

    /// Present `id` at `at_ms` and run one step.
    pub fn scan(&mut self, id: CredentialId, at_ms: u64) -> FeedbackEvent {
        self.clock.set(at_ms);
        self.reader.try_present(id).unwrap();
        self.control
            .step()
            .unwrap()
            .expect("presented credential was not handled")
    }

    /// Run one step at `at_ms` without presenting anything.
    pub fn idle_at(&mut self, at_ms: u64) {
        self.clock.set(at_ms);
        assert_eq!(self.control.step().unwrap(), None);
    }

    pub fn store_len(&self) -> usize {
        self.control.controller().store().len()
    }
}
