//! Background tasks module
//!
//! This module contains the periodic loops that run alongside the control
//! server: the one-second tick schedule and the battery watcher.

pub mod battery_watch;
pub mod tick_scheduler;

// Re-export main types
pub use battery_watch::battery_watch_task;
pub use tick_scheduler::{TickScheduler, TICK_INTERVAL};
