//! HTTP control surface
//!
//! The adapter between the outside world and the timer controller: the
//! notification action triggers re-enter through `/action/:action`, and the
//! zero-or-one bound UI client follows ticks via the `/ticks` stream.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::TimerController;
use handlers::*;

/// Shared handler context
#[derive(Clone)]
pub struct ServiceState {
    pub controller: Arc<TimerController>,
    pub host: String,
    pub port: u16,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: ServiceState) -> Router {
    Router::new()
        .route("/timer/start", post(start_handler))
        .route("/timer/stop", post(stop_handler))
        .route("/action/:action", post(action_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/ticks", get(ticks_handler).delete(unsubscribe_ticks_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
