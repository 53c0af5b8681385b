//! Recording lock actuator for tests.

use super::lock_state;
use crate::{Result, traits::LockActuator};
use std::sync::{Arc, Mutex};

/// [`LockActuator`] that records engage/release commands.
#[derive(Debug, Clone, Default)]
pub struct MockLock {
    commands: Arc<Mutex<Vec<bool>>>,
}

impl MockLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(true)` when the last command engaged the lock, `None` before
    /// any command.
    pub fn is_engaged(&self) -> Option<bool> {
        lock_state(&self.commands).last().copied()
    }

    /// Every command received, oldest first.
    pub fn commands(&self) -> Vec<bool> {
        lock_state(&self.commands).clone()
    }
}

impl LockActuator for MockLock {
    fn set_engaged(&mut self, engaged: bool) -> Result<()> {
        lock_state(&self.commands).push(engaged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_last_command() {
        let mut lock = MockLock::new();
        assert_eq!(lock.is_engaged(), None);

        lock.set_engaged(true).unwrap();
        lock.set_engaged(false).unwrap();

        assert_eq!(lock.is_engaged(), Some(false));
        assert_eq!(lock.commands(), vec![true, false]);
    }
}
