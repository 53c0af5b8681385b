//! The access-control state machine.
//!
//! # Dispatch
//!
//! A credential equal to the configured master is always handled by the
//! master branch, whatever the current mode:
//!
//! - two master scans within the double-tap window open **removal mode**
//!   (or extend it if already open)
//! - a single master scan opens or extends the **access window**
//!
//! Any other credential is dispatched on the mode:
//!
//! | Mode           | Known            | Unknown                                  |
//! |----------------|------------------|------------------------------------------|
//! | `Idle`         | access granted   | denied (then "needs master" on repeats)  |
//! | `AccessWindow` | already enrolled | enrolled, or capacity exceeded when full |
//! | `RemovalMode`  | removed          | not found                                |
//!
//! Every in-window credential moves the window start to the scan time, so an
//! operator can chain operations without re-presenting the master.
//!
//! # Ticks
//!
//! [`AccessController::tick`] closes a window once more than the timeout has
//! passed since its start, and drives the removal-mode flash otherwise.
//!
//! # Examples
//!
//! ```
//! use tapguard_controller::{AccessController, ControllerConfig, FeedbackEvent, ModeKind};
//! use tapguard_core::CredentialId;
//! use tapguard_hardware::mock::MemoryByteStore;
//! use tapguard_storage::CredentialStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let master = CredentialId::new([0x01, 0x02, 0x03, 0x04]);
//! let store = CredentialStore::load(MemoryByteStore::new(128))?;
//! let mut controller = AccessController::new(ControllerConfig::new(master), store);
//!
//! let card: CredentialId = "AA BB CC DD".parse()?;
//! assert_eq!(controller.handle_credential(master, 0)?, FeedbackEvent::MasterDetected);
//! assert_eq!(controller.handle_credential(card, 1_000)?, FeedbackEvent::Enrolled);
//!
//! assert_eq!(controller.tick(7_000), Some(FeedbackEvent::Ready));
//! assert_eq!(controller.mode_kind(), ModeKind::Idle);
//! assert_eq!(controller.store().len(), 1);
//! # Ok(())
//! # }
//! ```

use tapguard_core::CredentialId;
use tapguard_hardware::ByteStore;
use tapguard_storage::CredentialStore;
use tracing::{debug, info};

use crate::config::{ControllerConfig, as_millis};
use crate::error::ControllerResult;
use crate::feedback::FeedbackEvent;
use crate::state::{Mode, ModeKind, StateTransition, SystemState, TransitionHistory};
use crate::tap_tracker::MasterTapTracker;

/// Owns the credential store, the tap tracker and the system state, and
/// turns credential scans and clock ticks into feedback events.
#[derive(Debug)]
pub struct AccessController<S> {
    config: ControllerConfig,
    store: CredentialStore<S>,
    tracker: MasterTapTracker,
    state: SystemState,
    history: TransitionHistory,
}

impl<S: ByteStore> AccessController<S> {
    /// Create an idle controller around an already loaded store.
    pub fn new(config: ControllerConfig, store: CredentialStore<S>) -> Self {
        let tracker = MasterTapTracker::new(as_millis(config.double_tap_window));
        Self {
            config,
            store,
            tracker,
            state: SystemState::default(),
            history: TransitionHistory::new(),
        }
    }

    /// React to a credential read at `now_ms`.
    ///
    /// Returns the single feedback event for this read and logs one line
    /// with the event, the credential and the resulting store size. A
    /// window whose deadline has passed is closed first.
    ///
    /// # Errors
    ///
    /// Only persistence failures are errors; every access decision,
    /// including a full store, is reported as an event.
    pub fn handle_credential(
        &mut self,
        id: CredentialId,
        now_ms: u64,
    ) -> ControllerResult<FeedbackEvent> {
        // A read past the deadline belongs to idle mode even if no tick
        // has closed the window yet.
        self.expire_window(now_ms);

        let event = if id == self.config.master {
            self.handle_master(now_ms)
        } else {
            match self.state.mode {
                Mode::Idle => self.check_access(&id),
                Mode::AccessWindow { .. } => self.enroll(id, now_ms)?,
                Mode::RemovalMode { .. } => self.remove(&id, now_ms)?,
            }
        };

        info!(
            event = %event,
            credential = %id.to_hex(),
            store_size = self.store.len(),
            mode = %self.mode_kind(),
            "Credential handled"
        );
        Ok(event)
    }

    /// Advance timers to `now_ms`.
    ///
    /// Window expiry is checked first and returns [`FeedbackEvent::Ready`].
    /// Otherwise, in removal mode, a flash frame is emitted once the flash
    /// interval has elapsed. At most one event per call.
    pub fn tick(&mut self, now_ms: u64) -> Option<FeedbackEvent> {
        if self.expire_window(now_ms) {
            return Some(FeedbackEvent::Ready);
        }

        let flash_interval_ms = as_millis(self.config.flash_interval);
        if let Mode::RemovalMode {
            last_flash_ms,
            flash_on,
            ..
        } = &mut self.state.mode
            && now_ms.saturating_sub(*last_flash_ms) >= flash_interval_ms
        {
            *flash_on = !*flash_on;
            *last_flash_ms = now_ms;
            return Some(FeedbackEvent::RemovalModeFlashTick { on: *flash_on });
        }

        None
    }

    /// Close the open window if more than the timeout has passed since its
    /// start. Returns `true` if it was closed.
    fn expire_window(&mut self, now_ms: u64) -> bool {
        let timeout_ms = as_millis(self.config.window_timeout);
        match self.state.mode.window_start_ms() {
            Some(start) if now_ms.saturating_sub(start) > timeout_ms => {
                info!(
                    mode = %self.mode_kind(),
                    idle_ms = now_ms.saturating_sub(start),
                    "Window expired"
                );
                self.state.denied_once_awaiting_master = false;
                self.set_mode(Mode::Idle, now_ms);
                true
            }
            _ => false,
        }
    }

    fn handle_master(&mut self, now_ms: u64) -> FeedbackEvent {
        let taps = self.tracker.register(now_ms);
        self.state.denied_once_awaiting_master = false;

        match self.state.mode {
            Mode::RemovalMode { .. } => {
                self.state.mode.extend_window(now_ms);
                FeedbackEvent::RemovalModeEntered
            }
            _ if taps >= 2 => {
                self.tracker.reset();
                self.set_mode(
                    Mode::RemovalMode {
                        window_start_ms: now_ms,
                        last_flash_ms: now_ms,
                        flash_on: true,
                    },
                    now_ms,
                );
                FeedbackEvent::RemovalModeEntered
            }
            Mode::AccessWindow { .. } => {
                self.state.mode.extend_window(now_ms);
                FeedbackEvent::MasterDetected
            }
            Mode::Idle => {
                self.set_mode(
                    Mode::AccessWindow {
                        window_start_ms: now_ms,
                    },
                    now_ms,
                );
                FeedbackEvent::MasterDetected
            }
        }
    }

    fn check_access(&mut self, id: &CredentialId) -> FeedbackEvent {
        if self.store.contains(id) {
            self.state.denied_once_awaiting_master = false;
            FeedbackEvent::AccessGranted
        } else if self.state.denied_once_awaiting_master {
            FeedbackEvent::DeniedNeedsMaster
        } else {
            self.state.denied_once_awaiting_master = true;
            FeedbackEvent::AccessDenied
        }
    }

    fn enroll(&mut self, id: CredentialId, now_ms: u64) -> ControllerResult<FeedbackEvent> {
        self.state.mode.extend_window(now_ms);

        if self.store.contains(&id) {
            return Ok(FeedbackEvent::AlreadyEnrolled);
        }
        if self.store.is_full() {
            return Ok(FeedbackEvent::CapacityExceeded);
        }
        self.store.add(id)?;
        Ok(FeedbackEvent::Enrolled)
    }

    fn remove(&mut self, id: &CredentialId, now_ms: u64) -> ControllerResult<FeedbackEvent> {
        self.state.mode.extend_window(now_ms);

        match self.store.index_of(id) {
            Some(index) => {
                self.store.remove_at(index)?;
                Ok(FeedbackEvent::Removed)
            }
            None => Ok(FeedbackEvent::NotFoundForRemoval),
        }
    }

    fn set_mode(&mut self, mode: Mode, now_ms: u64) {
        let from = self.state.mode.kind();
        let to = mode.kind();
        self.state.mode = mode;

        if to == ModeKind::RemovalMode {
            self.state.denied_once_awaiting_master = false;
        }

        if from != to {
            debug!(from = %from, to = %to, at_ms = now_ms, "Mode transition");
            self.history.record(StateTransition {
                from,
                to,
                at_ms: now_ms,
            });
        }
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.state.mode.kind()
    }

    pub fn store(&self) -> &CredentialStore<S> {
        &self.store
    }

    pub fn tap_count(&self) -> u32 {
        self.tracker.count()
    }

    /// Recent mode transitions, oldest first.
    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Time at which the open window will be closed by a tick, if any.
    pub fn window_deadline_ms(&self) -> Option<u64> {
        self.state
            .mode
            .window_start_ms()
            .map(|start| start.saturating_add(as_millis(self.config.window_timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tapguard_core::constants::MAX_CARDS;
    use tapguard_hardware::mock::MemoryByteStore;

    const MASTER: CredentialId = CredentialId::new([0x01, 0x02, 0x03, 0x04]);
    const CARD: CredentialId = CredentialId::new([0xAA, 0xBB, 0xCC, 0xDD]);

    fn controller_with(cards: &[CredentialId]) -> AccessController<MemoryByteStore> {
        let mut store = CredentialStore::load(MemoryByteStore::new(128)).unwrap();
        for card in cards {
            store.add(*card).unwrap();
        }
        AccessController::new(ControllerConfig::new(MASTER), store)
    }

    fn filler(n: u8) -> CredentialId {
        CredentialId::new([0x55, 0x00, 0x00, n])
    }

    #[test]
    fn test_starts_idle() {
        let controller = controller_with(&[]);
        assert_eq!(controller.mode_kind(), ModeKind::Idle);
        assert!(!controller.state().denied_once_awaiting_master);
        assert!(controller.history().is_empty());
    }

    #[test]
    fn test_known_card_granted_in_idle() {
        let mut controller = controller_with(&[CARD]);
        let event = controller.handle_credential(CARD, 100).unwrap();

        assert_eq!(event, FeedbackEvent::AccessGranted);
        assert_eq!(controller.mode_kind(), ModeKind::Idle);
    }

    #[test]
    fn test_repeated_denial_changes_message_only() {
        let mut controller = controller_with(&[]);

        assert_eq!(
            controller.handle_credential(CARD, 0).unwrap(),
            FeedbackEvent::AccessDenied
        );
        assert!(controller.state().denied_once_awaiting_master);
        assert_eq!(
            controller.handle_credential(CARD, 500).unwrap(),
            FeedbackEvent::DeniedNeedsMaster
        );
        assert_eq!(controller.store().len(), 0);
    }

    #[test]
    fn test_master_clears_denied_flag() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(CARD, 0).unwrap();

        controller.handle_credential(MASTER, 100).unwrap();

        assert!(!controller.state().denied_once_awaiting_master);
    }

    #[test]
    fn test_recognized_card_clears_denied_flag() {
        let mut controller = controller_with(&[CARD]);
        controller.handle_credential(filler(1), 0).unwrap();

        controller.handle_credential(CARD, 100).unwrap();

        assert!(!controller.state().denied_once_awaiting_master);
        assert_eq!(
            controller.handle_credential(filler(1), 200).unwrap(),
            FeedbackEvent::AccessDenied
        );
    }

    #[test]
    fn test_single_master_opens_access_window() {
        let mut controller = controller_with(&[]);
        let event = controller.handle_credential(MASTER, 1_000).unwrap();

        assert_eq!(event, FeedbackEvent::MasterDetected);
        assert_eq!(
            controller.state().mode,
            Mode::AccessWindow {
                window_start_ms: 1_000
            }
        );
        assert_eq!(controller.window_deadline_ms(), Some(6_000));
    }

    #[rstest]
    #[case::inside_window(2_999, ModeKind::RemovalMode, FeedbackEvent::RemovalModeEntered)]
    #[case::outside_window(3_001, ModeKind::AccessWindow, FeedbackEvent::MasterDetected)]
    fn test_double_tap_boundary(
        #[case] gap: u64,
        #[case] mode: ModeKind,
        #[case] second: FeedbackEvent,
    ) {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 10_000).unwrap();

        let event = controller.handle_credential(MASTER, 10_000 + gap).unwrap();

        assert_eq!(event, second);
        assert_eq!(controller.mode_kind(), mode);
    }

    #[test]
    fn test_slow_master_taps_never_enter_removal() {
        let mut controller = controller_with(&[]);
        for n in 0..4 {
            let event = controller.handle_credential(MASTER, n * 3_001).unwrap();
            assert_eq!(event, FeedbackEvent::MasterDetected);
        }
        assert_eq!(controller.mode_kind(), ModeKind::AccessWindow);
    }

    #[test]
    fn test_entering_removal_resets_tracker_and_flag() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(CARD, 0).unwrap();
        controller.handle_credential(MASTER, 100).unwrap();
        controller.handle_credential(MASTER, 600).unwrap();

        assert_eq!(controller.mode_kind(), ModeKind::RemovalMode);
        assert_eq!(controller.tap_count(), 0);
        assert!(!controller.state().denied_once_awaiting_master);
    }

    #[test]
    fn test_master_in_removal_mode_extends_it() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();
        controller.handle_credential(MASTER, 500).unwrap();

        let event = controller.handle_credential(MASTER, 4_000).unwrap();

        assert_eq!(event, FeedbackEvent::RemovalModeEntered);
        assert_eq!(controller.state().mode.window_start_ms(), Some(4_000));
    }

    #[test]
    fn test_already_enrolled_in_window() {
        let mut controller = controller_with(&[CARD]);
        controller.handle_credential(MASTER, 0).unwrap();

        let event = controller.handle_credential(CARD, 1_000).unwrap();

        assert_eq!(event, FeedbackEvent::AlreadyEnrolled);
        assert_eq!(controller.store().len(), 1);
        assert_eq!(controller.state().mode.window_start_ms(), Some(1_000));
    }

    #[test]
    fn test_capacity_exceeded_in_window() {
        let cards: Vec<CredentialId> = (0..MAX_CARDS as u8).map(filler).collect();
        let mut controller = controller_with(&cards);
        controller.handle_credential(MASTER, 0).unwrap();

        let event = controller.handle_credential(CARD, 100).unwrap();

        assert_eq!(event, FeedbackEvent::CapacityExceeded);
        assert_eq!(controller.store().len(), MAX_CARDS);
        assert_eq!(controller.mode_kind(), ModeKind::AccessWindow);
    }

    #[test]
    fn test_window_extension_by_enrollment() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();
        controller.handle_credential(CARD, 4_999).unwrap();

        assert_eq!(controller.tick(9_999), None);
        assert_eq!(controller.mode_kind(), ModeKind::AccessWindow);
        assert_eq!(controller.tick(10_000), Some(FeedbackEvent::Ready));
        assert_eq!(controller.mode_kind(), ModeKind::Idle);
    }

    #[rstest]
    #[case(5_000, None)]
    #[case(5_001, Some(FeedbackEvent::Ready))]
    fn test_window_expiry_is_strict(#[case] now: u64, #[case] expected: Option<FeedbackEvent>) {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();

        assert_eq!(controller.tick(now), expected);
    }

    #[test]
    fn test_late_read_after_access_window_is_idle() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();

        let event = controller.handle_credential(CARD, 5_040).unwrap();

        assert_eq!(event, FeedbackEvent::AccessDenied);
        assert_eq!(controller.mode_kind(), ModeKind::Idle);
        assert!(controller.store().is_empty());
    }

    #[test]
    fn test_late_read_after_removal_mode_is_idle() {
        let mut controller = controller_with(&[CARD]);
        controller.handle_credential(MASTER, 0).unwrap();
        controller.handle_credential(MASTER, 500).unwrap();

        let event = controller.handle_credential(CARD, 5_540).unwrap();

        assert_eq!(event, FeedbackEvent::AccessGranted);
        assert_eq!(controller.mode_kind(), ModeKind::Idle);
        assert_eq!(controller.store().len(), 1);
    }

    #[test]
    fn test_late_master_reopens_access_window() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();

        let event = controller.handle_credential(MASTER, 5_040).unwrap();

        assert_eq!(event, FeedbackEvent::MasterDetected);
        assert_eq!(controller.state().mode.window_start_ms(), Some(5_040));
    }

    #[test]
    fn test_idle_tick_is_quiet() {
        let mut controller = controller_with(&[]);
        assert_eq!(controller.tick(1_000_000), None);
    }

    #[test]
    fn test_removal_flash_alternates_starting_off() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();
        controller.handle_credential(MASTER, 100).unwrap();

        assert_eq!(controller.tick(599), None);
        assert_eq!(
            controller.tick(600),
            Some(FeedbackEvent::RemovalModeFlashTick { on: false })
        );
        assert_eq!(controller.tick(900), None);
        assert_eq!(
            controller.tick(1_100),
            Some(FeedbackEvent::RemovalModeFlashTick { on: true })
        );
    }

    #[test]
    fn test_removal_expiry_beats_flash() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();
        controller.handle_credential(MASTER, 100).unwrap();

        assert_eq!(controller.tick(5_101), Some(FeedbackEvent::Ready));
        assert_eq!(controller.mode_kind(), ModeKind::Idle);
    }

    #[test]
    fn test_removal_of_unknown_extends_window() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();
        controller.handle_credential(MASTER, 100).unwrap();

        let event = controller.handle_credential(CARD, 3_000).unwrap();

        assert_eq!(event, FeedbackEvent::NotFoundForRemoval);
        assert_eq!(controller.state().mode.window_start_ms(), Some(3_000));
    }

    #[test]
    fn test_master_is_never_enrolled() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();
        controller.handle_credential(MASTER, 4_000).unwrap();

        assert!(!controller.store().contains(&MASTER));
    }

    #[test]
    fn test_history_records_mode_changes_only() {
        let mut controller = controller_with(&[]);
        controller.handle_credential(MASTER, 0).unwrap();
        controller.handle_credential(CARD, 1_000).unwrap();
        controller.handle_credential(MASTER, 1_500).unwrap();
        controller.tick(7_000);

        let kinds: Vec<(ModeKind, ModeKind)> =
            controller.history().iter().map(|t| (t.from, t.to)).collect();
        assert_eq!(
            kinds,
            vec![
                (ModeKind::Idle, ModeKind::AccessWindow),
                (ModeKind::AccessWindow, ModeKind::RemovalMode),
                (ModeKind::RemovalMode, ModeKind::Idle),
            ]
        );
    }
}
