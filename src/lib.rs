//! Pocket Watch - a foreground timer service with battery-aware notifications
//!
//! This library runs a one-second timer whose elapsed count, together with
//! the current battery level, is published to a persistent desktop
//! notification; a small HTTP surface exposes start/stop control and a tick
//! stream for a bound client.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::{create_router, ServiceState};
pub use config::{Config, TimerConfig};
pub use state::TimerController;
pub use utils::signals::shutdown_signal;
