//! Momentary door unlock.

use tapguard_hardware::{LockActuator, Result};
use tracing::{debug, info};

/// Keeps the lock engaged except for a fixed period after each grant.
#[derive(Debug)]
pub struct DoorLatch<L> {
    actuator: L,
    unlock_ms: u64,
    relock_at_ms: Option<u64>,
}

impl<L: LockActuator> DoorLatch<L> {
    pub fn new(actuator: L, unlock_ms: u64) -> Self {
        Self {
            actuator,
            unlock_ms,
            relock_at_ms: None,
        }
    }

    /// Engage the lock and drop any pending relock.
    pub fn engage(&mut self) -> Result<()> {
        self.relock_at_ms = None;
        self.actuator.set_engaged(true)?;
        debug!("Door locked");
        Ok(())
    }

    /// Release the lock until `now_ms + unlock duration`. A release while
    /// already open pushes the relock time out.
    pub fn release(&mut self, now_ms: u64) -> Result<()> {
        let relock_at = now_ms.saturating_add(self.unlock_ms);
        self.relock_at_ms = Some(relock_at);
        self.actuator.set_engaged(false)?;
        info!(relock_at_ms = relock_at, "Door unlocked");
        Ok(())
    }

    /// Re-engage once the unlock period is over. Returns `true` if it did.
    pub fn update(&mut self, now_ms: u64) -> Result<bool> {
        match self.relock_at_ms {
            Some(deadline) if now_ms >= deadline => {
                self.engage()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn is_released(&self) -> bool {
        self.relock_at_ms.is_some()
    }

    pub fn actuator(&self) -> &L {
        &self.actuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapguard_hardware::mock::MockLock;

    #[test]
    fn test_release_then_relock() {
        let lock = MockLock::new();
        let mut latch = DoorLatch::new(lock.clone(), 3_000);
        latch.engage().unwrap();

        latch.release(1_000).unwrap();
        assert_eq!(lock.is_engaged(), Some(false));
        assert!(!latch.update(3_999).unwrap());

        assert!(latch.update(4_000).unwrap());
        assert_eq!(lock.is_engaged(), Some(true));
        assert!(!latch.is_released());
        assert_eq!(lock.commands(), vec![true, false, true]);
    }

    #[test]
    fn test_second_release_extends() {
        let lock = MockLock::new();
        let mut latch = DoorLatch::new(lock.clone(), 3_000);

        latch.release(0).unwrap();
        latch.release(2_000).unwrap();

        assert!(!latch.update(3_500).unwrap());
        assert!(latch.update(5_000).unwrap());
    }
}
