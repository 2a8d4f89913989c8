//! End-to-end scenario for the HTTP control surface.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use pocket_watch::config::{TimerConfig, START_TIMER_ACTION, STOP_TIMER_ACTION};
use pocket_watch::services::notify::NotificationPresenter;
use pocket_watch::{create_router, ServiceState, TimerController};

fn test_app() -> (axum::Router, Arc<TimerController>) {
    let config = TimerConfig::default();
    let presenter = NotificationPresenter::log_only(config.notification_id);
    let controller = TimerController::new(config, presenter);
    let app = create_router(ServiceState {
        controller: Arc::clone(&controller),
        host: "127.0.0.1".to_string(),
        port: 0,
    });
    (app, controller)
}

async fn request(app: &axum::Router, method: &str, path: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let (app, _controller) = test_app();
    let (status, body) = request(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn timer_lifecycle_over_http() {
    let (app, controller) = test_app();

    let (status, body) = request(&app, "GET", "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["elapsed_ticks"], 0);
    assert_eq!(body["battery_percent"], serde_json::Value::Null);

    let (status, body) = request(&app, "POST", "/timer/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");

    let (status, body) = request(&app, "POST", "/timer/stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");

    // The counter survives a stop; a fresh start resumes from it.
    let frozen = controller.snapshot().unwrap().elapsed_ticks;
    let (_, body) = request(&app, "POST", "/timer/start").await;
    assert!(body["timer"]["elapsed_ticks"].as_u64().unwrap() >= frozen);

    controller.teardown().await;
}

#[tokio::test]
async fn action_identifiers_map_to_operations() {
    let (app, controller) = test_app();

    let path = format!("/action/{}", START_TIMER_ACTION);
    let (status, body) = request(&app, "POST", &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");

    let path = format!("/action/{}", STOP_TIMER_ACTION);
    let (status, body) = request(&app, "POST", &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");

    controller.teardown().await;
}

#[tokio::test]
async fn unknown_action_leaves_state_untouched() {
    let (app, controller) = test_app();

    let (status, body) = request(&app, "POST", "/action/SNOOZE_ACTION").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(controller.snapshot().unwrap().elapsed_ticks, 0);

    controller.teardown().await;
}

#[tokio::test]
async fn tick_listener_detaches_over_http() {
    let (app, controller) = test_app();

    let (status, body) = request(&app, "DELETE", "/ticks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Tick listener detached");

    controller.teardown().await;
}
