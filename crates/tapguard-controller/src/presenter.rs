//! Renders feedback events on the indicator and buzzer.
//!
//! Sticky colors stay until replaced and become the color to fall back to.
//! Auto-revert colors are replaced by the last sticky color once the revert
//! delay has elapsed, checked by [`FeedbackPresenter::update`].

use tapguard_hardware::{AudioDevice, Indicator, LedColor, Result};
use tracing::debug;

use crate::config::{PresenterConfig, as_millis};
use crate::feedback::{DisplayPolicy, FeedbackEvent};

/// Drives an [`Indicator`] and an [`AudioDevice`] from feedback events.
#[derive(Debug)]
pub struct FeedbackPresenter<I, A> {
    indicator: I,
    audio: A,
    revert_after_ms: u64,
    sticky_color: LedColor,
    revert_at_ms: Option<u64>,
}

impl<I: Indicator, A: AudioDevice> FeedbackPresenter<I, A> {
    pub fn new(indicator: I, audio: A, config: PresenterConfig) -> Self {
        Self {
            indicator,
            audio,
            revert_after_ms: as_millis(config.revert_after),
            sticky_color: LedColor::Off,
            revert_at_ms: None,
        }
    }

    /// Play the event's tone, if any, then show its color.
    ///
    /// An animation frame arriving while a transient color is showing only
    /// updates the fallback color.
    pub fn present(&mut self, event: FeedbackEvent, now_ms: u64) -> Result<()> {
        let intent = event.intent();

        match intent.policy {
            DisplayPolicy::Sticky => {
                self.sticky_color = intent.color;
                if event.is_animation() && self.revert_at_ms.is_some() {
                    return Ok(());
                }
                self.revert_at_ms = None;
            }
            DisplayPolicy::AutoRevertAfterTimeout => {
                self.revert_at_ms = Some(now_ms.saturating_add(self.revert_after_ms));
            }
        }

        if !event.is_animation() {
            debug!(event = %event, message = event.message(), "Presenting feedback");
        }
        if let Some(tone) = intent.tone {
            self.audio.play_pattern(tone)?;
        }
        self.indicator.set_color(intent.color)
    }

    /// Restore the sticky color if a transient one has expired.
    ///
    /// Returns `true` when the indicator changed.
    pub fn update(&mut self, now_ms: u64) -> Result<bool> {
        match self.revert_at_ms {
            Some(deadline) if now_ms >= deadline => {
                self.revert_at_ms = None;
                self.indicator.set_color(self.sticky_color)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Color the indicator falls back to.
    pub fn sticky_color(&self) -> LedColor {
        self.sticky_color
    }

    pub fn revert_pending(&self) -> bool {
        self.revert_at_ms.is_some()
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}
