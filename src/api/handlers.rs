//! HTTP endpoint handlers

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::Json,
};
use futures::stream::Stream;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::responses::{ApiResponse, HealthResponse, StatusResponse};
use super::ServiceState;

/// Handle POST /timer/start - Start the timer
pub async fn start_handler(
    State(service): State<ServiceState>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match service.controller.start().await {
        Ok(timer) => {
            info!("Start endpoint called - timer running");
            Ok(Json(ApiResponse::for_state("Timer started".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/stop - Stop the timer, freezing the counter
pub async fn stop_handler(
    State(service): State<ServiceState>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match service.controller.stop() {
        Ok(timer) => {
            info!("Stop endpoint called - timer idle");
            Ok(Json(ApiResponse::for_state("Timer stopped".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to stop timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /action/:action - Notification action trigger entry point.
///
/// Unrecognized actions are not errors; they leave the state alone and
/// republish the notification.
pub async fn action_handler(
    State(service): State<ServiceState>,
    Path(action): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match service.controller.dispatch(Some(&action)).await {
        Ok(timer) => {
            info!(action = %action, "Action dispatched");
            Ok(Json(ApiResponse::for_state(
                format!("Action {} handled", action),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to dispatch action {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current timer and battery status
pub async fn status_handler(
    State(service): State<ServiceState>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match service.controller.snapshot() {
        Ok(timer) => timer,
        Err(e) => {
            error!("Failed to read timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = service.controller.last_action();

    Ok(Json(StatusResponse {
        battery_percent: timer.battery_percent(),
        timer,
        uptime: service.controller.uptime(),
        port: service.port,
        host: service.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle GET /ticks - Subscribe to the tick stream.
///
/// Connecting registers this client as the single tick listener, replacing
/// any previous one. A client that vanishes without `DELETE /ticks` leaves
/// a dead channel behind; ticks sent to it are quietly discarded.
pub async fn ticks_handler(
    State(service): State<ServiceState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel();
    service.controller.subscribe_tick(Box::new(move |elapsed| {
        let _ = tx.send(elapsed);
    }));
    info!("Tick stream client subscribed");

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        let elapsed = rx.recv().await?;
        let event = Event::default().event("tick").data(elapsed.to_string());
        Some((Ok::<_, Infallible>(event), rx))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle DELETE /ticks - Explicitly detach the tick listener
pub async fn unsubscribe_ticks_handler(
    State(service): State<ServiceState>,
) -> Result<Json<ApiResponse>, StatusCode> {
    service.controller.unsubscribe_tick();
    info!("Tick stream client unsubscribed");
    match service.controller.snapshot() {
        Ok(timer) => Ok(Json(ApiResponse::for_state(
            "Tick listener detached".to_string(),
            timer,
        ))),
        Err(e) => {
            error!("Failed to read timer state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
