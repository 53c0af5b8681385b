//! Recording audio device for tests.

use super::lock_state;
use crate::{Result, traits::AudioDevice, types::TonePattern};
use std::sync::{Arc, Mutex};

/// [`AudioDevice`] that records patterns instead of playing them.
#[derive(Debug, Clone, Default)]
pub struct MockAudio {
    played: Arc<Mutex<Vec<TonePattern>>>,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns played so far, oldest first.
    pub fn played(&self) -> Vec<TonePattern> {
        lock_state(&self.played).clone()
    }

    pub fn last(&self) -> Option<TonePattern> {
        lock_state(&self.played).last().copied()
    }
}

impl AudioDevice for MockAudio {
    fn play_pattern(&mut self, pattern: TonePattern) -> Result<()> {
        lock_state(&self.played).push(pattern);
        Ok(())
    }
}
