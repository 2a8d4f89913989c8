//! Pocket Watch - a foreground timer service with battery-aware notifications
//!
//! This is the main entry point for the pocket-watch daemon.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use pocket_watch::{
    api::{create_router, ServiceState},
    config::Config,
    services::battery::{probe_status, BatteryProbe, SysfsBatteryProbe},
    services::notify::NotificationPresenter,
    state::TimerController,
    tasks::battery_watch_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pocket_watch={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pocket-watch v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, battery_path={}, battery_poll={}s",
        config.host,
        config.port,
        config.battery_path.display(),
        config.battery_poll
    );

    let probe: Arc<dyn BatteryProbe> = Arc::new(SysfsBatteryProbe::new(&config.battery_path));
    // A missing battery supply is a degraded mode, not a startup failure.
    if let Err(e) = probe_status(probe.as_ref()) {
        warn!("{}; battery will be shown as unknown", e);
    }

    let timer_config = config.timer_config();
    let presenter = NotificationPresenter::desktop(timer_config.notification_id);
    let controller = TimerController::new(timer_config, presenter);

    // First entry carries no action: publish the notification as-is.
    controller
        .dispatch(None)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    // Battery monitoring runs for the controller's whole lifetime,
    // independent of the timer phase.
    let battery_task = tokio::spawn(battery_watch_task(
        Arc::clone(&probe),
        Arc::downgrade(&controller),
        config.battery_poll_interval(),
    ));

    let app = create_router(ServiceState {
        controller: Arc::clone(&controller),
        host: config.host.clone(),
        port: config.port,
    });

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timer/start    - Start the timer");
    info!("  POST   /timer/stop     - Stop the timer");
    info!("  POST   /action/:action - Notification action trigger");
    info!("  GET    /status         - Current timer and battery status");
    info!("  GET    /health         - Health check");
    info!("  GET    /ticks          - Tick stream (SSE)");
    info!("  DELETE /ticks          - Detach the tick listener");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    battery_task.abort();
    controller.teardown().await;

    info!("Service shutdown complete");
    Ok(())
}
