//! Output drivers that report to the log instead of real hardware.

use tapguard_hardware::{AudioDevice, Indicator, LedColor, LockActuator, Result, TonePattern};
use tracing::info;

#[derive(Debug, Default)]
pub struct ConsoleIndicator;

impl Indicator for ConsoleIndicator {
    fn set_color(&mut self, color: LedColor) -> Result<()> {
        let (r, g, b) = color.as_rgb();
        info!(target: "tapguard::indicator", "LED {:?} (#{:02X}{:02X}{:02X})", color, r, g, b);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConsoleBuzzer;

impl AudioDevice for ConsoleBuzzer {
    fn play_pattern(&mut self, pattern: TonePattern) -> Result<()> {
        info!(
            target: "tapguard::buzzer",
            "Tone {:?} ({} steps, {} ms)",
            pattern,
            pattern.steps().len(),
            pattern.total_duration_ms()
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConsoleLock;

impl LockActuator for ConsoleLock {
    fn set_engaged(&mut self, engaged: bool) -> Result<()> {
        let state = if engaged { "engaged" } else { "released" };
        info!(target: "tapguard::lock", "Lock {}", state);
        Ok(())
    }
}
