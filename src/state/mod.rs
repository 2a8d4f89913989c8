//! State management module
//!
//! This module contains the timer state structure and the controller that
//! owns it.

pub mod controller;
pub mod timer_state;

// Re-export main types
pub use controller::{TickListener, TimerController};
pub use timer_state::{Phase, TimerState};
