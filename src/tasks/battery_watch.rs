//! Battery watch background task

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, info};

use crate::services::battery::{BatteryProbe, BatteryReading};
use crate::state::TimerController;

/// Background task that polls the battery probe and forwards changed
/// readings to the controller.
///
/// The controller is held weakly: once it is gone the task winds down on
/// its own instead of keeping it alive or failing.
pub async fn battery_watch_task(
    probe: Arc<dyn BatteryProbe>,
    controller: Weak<TimerController>,
    poll_interval: Duration,
) {
    info!(period_secs = poll_interval.as_secs(), "starting battery watch task");

    let mut ticker = interval(poll_interval);
    let mut last_reading: Option<BatteryReading> = None;

    loop {
        ticker.tick().await;

        let reading = probe.read();
        // The platform only reports changes; polling mimics that.
        if last_reading == Some(reading) {
            continue;
        }
        last_reading = Some(reading);

        match controller.upgrade() {
            Some(controller) => {
                debug!(level = reading.level, scale = reading.scale, "battery level changed");
                controller.handle_battery(reading).await;
            }
            None => {
                debug!("controller gone, stopping battery watch task");
                break;
            }
        }
    }
}
