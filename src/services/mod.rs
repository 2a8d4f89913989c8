//! Platform integration module
//!
//! This module contains the pieces that talk to the outside world: the
//! battery readout and the desktop notification surface.

pub mod battery;
pub mod notify;

// Re-export main types
pub use battery::{BatteryProbe, BatteryReading, SysfsBatteryProbe};
pub use notify::{NotificationPayload, NotificationPresenter};
