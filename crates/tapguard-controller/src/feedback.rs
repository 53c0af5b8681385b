//! Feedback events and their indicator/tone mapping.
//!
//! [`FeedbackEvent::intent`] is the single table pairing each event with a
//! color, an optional tone and a display policy. The match is exhaustive, so
//! adding an event without a mapping fails to compile.
//!
//! | Event                  | Color        | Tone           | Policy     |
//! |------------------------|--------------|----------------|------------|
//! | `Ready`                | blue         | none           | sticky     |
//! | `MasterDetected`       | magenta      | master chime   | sticky     |
//! | `AccessGranted`        | green        | confirm        | auto-revert|
//! | `AccessDenied`         | red          | error          | auto-revert|
//! | `DeniedNeedsMaster`    | red          | error          | auto-revert|
//! | `Enrolled`             | green        | success        | auto-revert|
//! | `AlreadyEnrolled`      | yellow       | warning        | auto-revert|
//! | `CapacityExceeded`     | red          | error          | auto-revert|
//! | `Removed`              | cyan         | confirm        | auto-revert|
//! | `NotFoundForRemoval`   | yellow       | warning        | auto-revert|
//! | `RemovalModeEntered`   | orange       | removal alarm  | sticky     |
//! | `RemovalModeFlashTick` | orange / off | none           | sticky     |

use std::fmt;

use serde::{Deserialize, Serialize};
use tapguard_hardware::{LedColor, TonePattern};

/// Named outcome emitted by the access controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackEvent {
    /// Idle and waiting for a credential.
    Ready,
    /// Master presented once: access window open or extended.
    MasterDetected,
    AccessGranted,
    AccessDenied,
    /// Unknown credential rejected again before a master scan.
    DeniedNeedsMaster,
    Enrolled,
    AlreadyEnrolled,
    CapacityExceeded,
    Removed,
    NotFoundForRemoval,
    /// Removal mode entered, or extended by another master scan.
    RemovalModeEntered,
    /// Periodic removal-mode animation frame.
    RemovalModeFlashTick { on: bool },
}

/// How long an intent's color stays on the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPolicy {
    /// Stays until another color replaces it.
    Sticky,
    /// Reverts to the last sticky color after a fixed time.
    AutoRevertAfterTimeout,
}

/// What the indicator and buzzer should do for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackIntent {
    pub color: LedColor,
    pub tone: Option<TonePattern>,
    pub policy: DisplayPolicy,
}

impl FeedbackIntent {
    const fn sticky(color: LedColor, tone: Option<TonePattern>) -> Self {
        Self {
            color,
            tone,
            policy: DisplayPolicy::Sticky,
        }
    }

    const fn transient(color: LedColor, tone: TonePattern) -> Self {
        Self {
            color,
            tone: Some(tone),
            policy: DisplayPolicy::AutoRevertAfterTimeout,
        }
    }
}

impl FeedbackEvent {
    /// Color, tone and display policy for this event.
    pub fn intent(&self) -> FeedbackIntent {
        use FeedbackEvent::*;

        match self {
            Ready => FeedbackIntent::sticky(LedColor::Blue, None),
            MasterDetected => {
                FeedbackIntent::sticky(LedColor::Magenta, Some(TonePattern::MasterChime))
            }
            AccessGranted => FeedbackIntent::transient(LedColor::Green, TonePattern::Confirm),
            AccessDenied | DeniedNeedsMaster | CapacityExceeded => {
                FeedbackIntent::transient(LedColor::Red, TonePattern::Error)
            }
            Enrolled => FeedbackIntent::transient(LedColor::Green, TonePattern::Success),
            AlreadyEnrolled | NotFoundForRemoval => {
                FeedbackIntent::transient(LedColor::Yellow, TonePattern::Warning)
            }
            Removed => FeedbackIntent::transient(LedColor::Cyan, TonePattern::Confirm),
            RemovalModeEntered => {
                FeedbackIntent::sticky(LedColor::Orange, Some(TonePattern::RemovalAlarm))
            }
            RemovalModeFlashTick { on: true } => FeedbackIntent::sticky(LedColor::Orange, None),
            RemovalModeFlashTick { on: false } => FeedbackIntent::sticky(LedColor::Off, None),
        }
    }

    /// Animation frames only refresh the sticky color; they never cut a
    /// transient confirmation short.
    pub fn is_animation(&self) -> bool {
        matches!(self, FeedbackEvent::RemovalModeFlashTick { .. })
    }

    /// Stable snake_case name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            FeedbackEvent::Ready => "ready",
            FeedbackEvent::MasterDetected => "master_detected",
            FeedbackEvent::AccessGranted => "access_granted",
            FeedbackEvent::AccessDenied => "access_denied",
            FeedbackEvent::DeniedNeedsMaster => "denied_needs_master",
            FeedbackEvent::Enrolled => "enrolled",
            FeedbackEvent::AlreadyEnrolled => "already_enrolled",
            FeedbackEvent::CapacityExceeded => "capacity_exceeded",
            FeedbackEvent::Removed => "removed",
            FeedbackEvent::NotFoundForRemoval => "not_found_for_removal",
            FeedbackEvent::RemovalModeEntered => "removal_mode_entered",
            FeedbackEvent::RemovalModeFlashTick { .. } => "removal_mode_flash_tick",
        }
    }

    /// Human-readable operator message.
    pub fn message(&self) -> &'static str {
        match self {
            FeedbackEvent::Ready => "Ready, present a card",
            FeedbackEvent::MasterDetected => "Master card: present a card to enroll",
            FeedbackEvent::AccessGranted => "Access granted",
            FeedbackEvent::AccessDenied => "Access denied",
            FeedbackEvent::DeniedNeedsMaster => "Access denied, present the master card to enroll",
            FeedbackEvent::Enrolled => "Card enrolled",
            FeedbackEvent::AlreadyEnrolled => "Card already enrolled",
            FeedbackEvent::CapacityExceeded => "Card store full, enrollment denied",
            FeedbackEvent::Removed => "Card removed",
            FeedbackEvent::NotFoundForRemoval => "Card not enrolled, nothing to remove",
            FeedbackEvent::RemovalModeEntered => "Removal mode: present a card to remove",
            FeedbackEvent::RemovalModeFlashTick { .. } => "Removal mode",
        }
    }
}

impl fmt::Display for FeedbackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
