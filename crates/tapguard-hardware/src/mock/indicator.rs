//! Recording indicator for tests.

use super::lock_state;
use crate::{Result, traits::Indicator, types::LedColor};
use std::sync::{Arc, Mutex};

/// [`Indicator`] that records every color it is asked to show.
#[derive(Debug, Clone, Default)]
pub struct MockIndicator {
    history: Arc<Mutex<Vec<LedColor>>>,
}

impl MockIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The color currently shown, if any was set.
    pub fn current(&self) -> Option<LedColor> {
        lock_state(&self.history).last().copied()
    }

    /// Every color shown so far, oldest first.
    pub fn history(&self) -> Vec<LedColor> {
        lock_state(&self.history).clone()
    }
}

impl Indicator for MockIndicator {
    fn set_color(&mut self, color: LedColor) -> Result<()> {
        lock_state(&self.history).push(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_colors_across_clones() {
        let mut indicator = MockIndicator::new();
        let observer = indicator.clone();
        assert_eq!(observer.current(), None);

        indicator.set_color(LedColor::Green).unwrap();
        indicator.set_color(LedColor::Red).unwrap();

        assert_eq!(observer.current(), Some(LedColor::Red));
        assert_eq!(observer.history(), vec![LedColor::Green, LedColor::Red]);
    }
}
