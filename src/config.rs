//! Configuration and CLI argument handling

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Action identifier that resolves to the controller's start operation
pub const START_TIMER_ACTION: &str = "START_TIMER_ACTION";

/// Action identifier that resolves to the controller's stop operation
pub const STOP_TIMER_ACTION: &str = "STOP_TIMER_ACTION";

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "pocket-watch")]
#[command(about = "A foreground timer service with battery-aware notifications")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Port to bind the control server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Power-supply directory the battery watcher reads from
    #[arg(long, default_value = "/sys/class/power_supply/BAT0")]
    pub battery_path: PathBuf,

    /// Seconds between battery polls
    #[arg(long, default_value = "30")]
    pub battery_poll: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Interval between battery polls
    pub fn battery_poll_interval(&self) -> Duration {
        Duration::from_secs(self.battery_poll.max(1))
    }

    /// Fixed identifiers handed to the timer controller
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::default()
    }
}

/// Fixed identifiers the controller publishes under and reacts to.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Replace-id for the notification; one id means one visible notification
    pub notification_id: u32,
    /// Notification title line
    pub title: String,
    /// Action identifier mapped to `start()`
    pub start_action: String,
    /// Action identifier mapped to `stop()`
    pub stop_action: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            notification_id: 1,
            title: "Timer Service".to_string(),
            start_action: START_TIMER_ACTION.to_string(),
            stop_action: STOP_TIMER_ACTION.to_string(),
        }
    }
}
