//! Timer state structure and management

use serde::{Deserialize, Serialize};

/// Run phase of the timer controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
}

/// Timer state: elapsed tick counter plus the last known battery fraction.
///
/// The counter is monotonic for the lifetime of the controller. Stopping
/// freezes it; a later start resumes counting from the frozen value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub elapsed_ticks: u64,
    /// Battery fraction in [0, 1]; `None` until the first usable reading
    pub battery: Option<f64>,
}

impl TimerState {
    /// Create a new idle timer state
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            elapsed_ticks: 0,
            battery: None,
        }
    }

    /// Check if the timer is running
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Record one elapsed tick and return the new count
    pub fn record_tick(&mut self) -> u64 {
        self.elapsed_ticks += 1;
        self.elapsed_ticks
    }

    /// Store a battery fraction, clamped to [0, 1]
    pub fn set_battery_fraction(&mut self, fraction: f64) {
        self.battery = Some(fraction.clamp(0.0, 1.0));
    }

    /// Battery level as a percentage, if known
    pub fn battery_percent(&self) -> Option<f64> {
        self.battery.map(|fraction| fraction * 100.0)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
