//! Controller modes and transition history.
//!
//! # Modes
//!
//! - `Idle`: ordinary access checks
//! - `AccessWindow`: unknown credentials are enrolled
//! - `RemovalMode`: known credentials are deleted
//!
//! Both windows carry the time they were opened or last extended. They are
//! mutually exclusive: entering removal mode closes an open access window.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of transitions kept for diagnostics.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Current mode plus the data each mode needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,

    AccessWindow {
        window_start_ms: u64,
    },

    RemovalMode {
        window_start_ms: u64,
        /// Time of the last flash toggle (or of entry).
        last_flash_ms: u64,
        /// Whether the removal color is currently lit.
        flash_on: bool,
    },
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Idle => ModeKind::Idle,
            Mode::AccessWindow { .. } => ModeKind::AccessWindow,
            Mode::RemovalMode { .. } => ModeKind::RemovalMode,
        }
    }

    /// Start of the current window, `None` when idle.
    pub fn window_start_ms(&self) -> Option<u64> {
        match self {
            Mode::Idle => None,
            Mode::AccessWindow { window_start_ms } | Mode::RemovalMode { window_start_ms, .. } => {
                Some(*window_start_ms)
            }
        }
    }

    /// Move the window start to `now_ms`. No effect when idle.
    pub(crate) fn extend_window(&mut self, now_ms: u64) {
        match self {
            Mode::Idle => {}
            Mode::AccessWindow { window_start_ms } | Mode::RemovalMode { window_start_ms, .. } => {
                *window_start_ms = now_ms;
            }
        }
    }
}

/// Data-free mode discriminant, used in logs and history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Idle,
    AccessWindow,
    RemovalMode,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModeKind::Idle => "Idle",
            ModeKind::AccessWindow => "AccessWindow",
            ModeKind::RemovalMode => "RemovalMode",
        };
        write!(f, "{}", name)
    }
}

/// Mode plus the orthogonal "denied once" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemState {
    pub mode: Mode,

    /// Set after an unknown credential is rejected in idle mode; cleared by
    /// any recognized or master credential and by every window transition.
    /// Only changes which denial event is reported.
    pub denied_once_awaiting_master: bool,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            mode: Mode::Idle,
            denied_once_awaiting_master: false,
        }
    }
}

/// A recorded change of mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: ModeKind,
    pub to: ModeKind,
    pub at_ms: u64,
}

/// Bounded log of mode transitions, oldest first.
#[derive(Debug, Clone, Default)]
pub struct TransitionHistory {
    entries: VecDeque<StateTransition>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub(crate) fn record(&mut self, transition: StateTransition) {
        self.entries.push_back(transition);
        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateTransition> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&StateTransition> {
        self.entries.back()
    }

    /// The most recent `count` transitions, oldest first.
    pub fn last_n(&self, count: usize) -> Vec<StateTransition> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(at_ms: u64) -> StateTransition {
        StateTransition {
            from: ModeKind::Idle,
            to: ModeKind::AccessWindow,
            at_ms,
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = TransitionHistory::new();
        for at in 0..(MAX_HISTORY_SIZE as u64 + 5) {
            history.record(transition(at));
        }

        assert_eq!(history.len(), MAX_HISTORY_SIZE);
        assert_eq!(history.iter().next().map(|t| t.at_ms), Some(5));
        assert_eq!(history.last().map(|t| t.at_ms), Some(104));
    }

    #[test]
    fn test_last_n() {
        let mut history = TransitionHistory::new();
        for at in 0..4 {
            history.record(transition(at));
        }

        let recent: Vec<u64> = history.last_n(2).iter().map(|t| t.at_ms).collect();
        assert_eq!(recent, vec![2, 3]);
        assert_eq!(history.last_n(10).len(), 4);
    }

    #[test]
    fn test_extend_window() {
        let mut mode = Mode::RemovalMode {
            window_start_ms: 10,
            last_flash_ms: 10,
            flash_on: true,
        };
        mode.extend_window(900);
        assert_eq!(mode.window_start_ms(), Some(900));
        assert_eq!(mode.kind(), ModeKind::RemovalMode);

        let mut idle = Mode::Idle;
        idle.extend_window(900);
        assert_eq!(idle.window_start_ms(), None);
    }

    #[test]
    fn test_transition_serializes_snake_case() {
        let json = serde_json::to_string(&transition(42)).unwrap();
        assert_eq!(json, r#"{"from":"idle","to":"access_window","at_ms":42}"#);
    }
}
