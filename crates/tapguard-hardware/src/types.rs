//! Output vocabulary shared by the feedback drivers.
//!
//! The access-control core picks an [`LedColor`] and a [`TonePattern`]; the
//! drivers translate them into PWM duty cycles and buzzer frequencies.

use serde::{Deserialize, Serialize};

/// Colors the status light can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedColor {
    Off,
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Cyan,
    Magenta,
}

impl LedColor {
    /// 8-bit channel values to drive the LED with.
    pub fn as_rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Off => (0, 0, 0),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
            Self::Blue => (0, 0, 255),
            Self::Yellow => (255, 200, 0),
            Self::Orange => (255, 100, 0),
            Self::Cyan => (0, 255, 255),
            Self::Magenta => (255, 0, 255),
        }
    }
}

/// One tone of a pattern: frequency in hertz (0 is a rest) and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneStep {
    pub frequency_hz: u16,
    pub duration_ms: u16,
}

const fn step(frequency_hz: u16, duration_ms: u16) -> ToneStep {
    ToneStep {
        frequency_hz,
        duration_ms,
    }
}

const CONFIRM: &[ToneStep] = &[step(2000, 100)];
const SUCCESS: &[ToneStep] = &[step(1500, 100), step(0, 50), step(2500, 150)];
const WARNING: &[ToneStep] = &[step(1200, 100), step(0, 80), step(1200, 100)];
const ERROR: &[ToneStep] = &[step(400, 600)];
const MASTER_CHIME: &[ToneStep] = &[step(1800, 120), step(2400, 180)];
const REMOVAL_ALARM: &[ToneStep] = &[
    step(2200, 100),
    step(0, 50),
    step(2200, 100),
    step(0, 50),
    step(2200, 200),
];

/// Named buzzer patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TonePattern {
    /// Single short high beep.
    Confirm,

    /// Two rising beeps.
    Success,

    /// Two short mid beeps.
    Warning,

    /// One long low tone.
    Error,

    /// Two-tone chime announcing the master credential.
    MasterChime,

    /// Three short beeps announcing removal mode.
    RemovalAlarm,
}

impl TonePattern {
    /// The tone sequence a driver should play for this pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapguard_hardware::TonePattern;
    ///
    /// assert_eq!(TonePattern::Confirm.steps().len(), 1);
    /// assert_eq!(TonePattern::RemovalAlarm.total_duration_ms(), 500);
    /// ```
    pub fn steps(&self) -> &'static [ToneStep] {
        match self {
            Self::Confirm => CONFIRM,
            Self::Success => SUCCESS,
            Self::Warning => WARNING,
            Self::Error => ERROR,
            Self::MasterChime => MASTER_CHIME,
            Self::RemovalAlarm => REMOVAL_ALARM,
        }
    }

    /// Total playback time of the pattern.
    pub fn total_duration_ms(&self) -> u32 {
        self.steps().iter().map(|s| u32::from(s.duration_ms)).sum()
    }
}
