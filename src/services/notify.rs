//! Desktop notification surface
//!
//! Rendering is pure; publishing goes through a backend abstraction so the
//! rest of the crate never touches the notification API directly. The
//! default backend is notify-rust with a fixed replace-id, downgraded to a
//! log-only backend if the notification service stops cooperating.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::TimerConfig;
use crate::state::TimerState;

/// Failure modes of a notification backend
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The platform refused permission to post; an expected degraded mode
    #[error("notification permission denied")]
    PermissionDenied,
    #[error("notification backend failure: {0}")]
    Backend(String),
}

/// Action button carried on the notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub id: String,
    pub label: String,
}

/// Renderable notification content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub timer_line: String,
    pub battery_line: String,
    pub actions: Vec<NotificationAction>,
}

/// Render the notification content for a timer state
pub fn render(state: &TimerState, config: &TimerConfig) -> NotificationPayload {
    let battery_line = match state.battery_percent() {
        Some(percent) => format!("Battery value: {}", percent),
        None => "Battery value: unknown".to_string(),
    };

    NotificationPayload {
        title: config.title.clone(),
        timer_line: format!("Timer value: {}", state.elapsed_ticks),
        battery_line,
        actions: vec![
            NotificationAction {
                id: config.start_action.clone(),
                label: "Start timer".to_string(),
            },
            NotificationAction {
                id: config.stop_action.clone(),
                label: "Stop timer".to_string(),
            },
        ],
    }
}

/// Abstraction over the platform notification surface
#[async_trait]
pub trait NotificationBackend: Send {
    /// Publish the payload under the given id, replacing any notification
    /// previously published under the same id
    async fn publish(&mut self, id: u32, payload: &NotificationPayload) -> Result<(), NotifyError>;

    /// Withdraw the notification published under the given id
    async fn close(&mut self, id: u32);
}

/// Backend publishing real desktop notifications via notify-rust
pub struct DesktopBackend {
    handle: Option<notify_rust::NotificationHandle>,
}

impl DesktopBackend {
    pub fn new() -> Self {
        Self { handle: None }
    }
}

impl Default for DesktopBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationBackend for DesktopBackend {
    async fn publish(&mut self, id: u32, payload: &NotificationPayload) -> Result<(), NotifyError> {
        let mut notification = notify_rust::Notification::new();
        notification
            .appname(&payload.title)
            .summary(&payload.title)
            .body(&format!("{}\n{}", payload.timer_line, payload.battery_line))
            .id(id)
            .urgency(notify_rust::Urgency::Normal);
        for action in &payload.actions {
            notification.action(&action.id, &action.label);
        }

        match notification.show_async().await {
            Ok(handle) => {
                debug!(id, "notification published");
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => Err(NotifyError::Backend(e.to_string())),
        }
    }

    async fn close(&mut self, id: u32) {
        if self.handle.take().is_none() {
            return;
        }
        // NotificationHandle::close blocks on the session bus; replace the
        // notification with a near-immediate timeout one instead.
        let _ = notify_rust::Notification::new()
            .id(id)
            .timeout(notify_rust::Timeout::Milliseconds(1))
            .show_async()
            .await;
    }
}

/// Fallback backend that only writes log lines
pub struct LogBackend;

#[async_trait]
impl NotificationBackend for LogBackend {
    async fn publish(&mut self, id: u32, payload: &NotificationPayload) -> Result<(), NotifyError> {
        info!(
            id,
            "[NOTIFY] {} | {} | {}",
            payload.title,
            payload.timer_line,
            payload.battery_line
        );
        Ok(())
    }

    async fn close(&mut self, _id: u32) {}
}

/// Publishes rendered timer state to the notification surface.
///
/// A permission-denied publish is skipped without complaint. Any other
/// backend failure downgrades this presenter to [`LogBackend`] for the rest
/// of its life.
pub struct NotificationPresenter {
    id: u32,
    backend: Mutex<Box<dyn NotificationBackend>>,
}

impl NotificationPresenter {
    pub fn new(id: u32, backend: Box<dyn NotificationBackend>) -> Self {
        Self {
            id,
            backend: Mutex::new(backend),
        }
    }

    /// Presenter backed by real desktop notifications
    pub fn desktop(id: u32) -> Self {
        Self::new(id, Box::new(DesktopBackend::new()))
    }

    /// Presenter that only logs; used when no notification service exists
    pub fn log_only(id: u32) -> Self {
        Self::new(id, Box::new(LogBackend))
    }

    /// Publish the payload, degrading silently instead of failing
    pub async fn publish(&self, payload: &NotificationPayload) {
        let mut backend = self.backend.lock().await;
        match backend.publish(self.id, payload).await {
            Ok(()) => {}
            Err(NotifyError::PermissionDenied) => {
                debug!(id = self.id, "notification permission denied; publish skipped");
            }
            Err(e) => {
                warn!(error = %e, "notification backend failed; switching to log-only");
                *backend = Box::new(LogBackend);
            }
        }
    }

    /// Withdraw the visible notification
    pub async fn close(&self) {
        self.backend.lock().await.close(self.id).await;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every published payload for assertions
    pub(crate) struct RecordingBackend {
        pub published: Arc<Mutex<Vec<NotificationPayload>>>,
    }

    impl RecordingBackend {
        pub fn new() -> (Self, Arc<Mutex<Vec<NotificationPayload>>>) {
            let published = Arc::new(Mutex::new(Vec::new()));
            let backend = Self {
                published: Arc::clone(&published),
            };
            (backend, published)
        }
    }

    #[async_trait]
    impl NotificationBackend for RecordingBackend {
        async fn publish(
            &mut self,
            _id: u32,
            payload: &NotificationPayload,
        ) -> Result<(), NotifyError> {
            self.published.lock().unwrap().push(payload.clone());
            Ok(())
        }

        async fn close(&mut self, _id: u32) {}
    }

    /// Refuses every publish with a permission error
    pub(crate) struct DeniedBackend {
        pub attempts: Arc<Mutex<u32>>,
    }

    impl DeniedBackend {
        pub fn new() -> (Self, Arc<Mutex<u32>>) {
            let attempts = Arc::new(Mutex::new(0));
            let backend = Self {
                attempts: Arc::clone(&attempts),
            };
            (backend, attempts)
        }
    }

    #[async_trait]
    impl NotificationBackend for DeniedBackend {
        async fn publish(
            &mut self,
            _id: u32,
            _payload: &NotificationPayload,
        ) -> Result<(), NotifyError> {
            *self.attempts.lock().unwrap() += 1;
            Err(NotifyError::PermissionDenied)
        }

        async fn close(&mut self, _id: u32) {}
    }

    /// Fails every publish with a backend error
    pub(crate) struct BrokenBackend {
        pub attempts: Arc<Mutex<u32>>,
    }

    impl BrokenBackend {
        pub fn new() -> (Self, Arc<Mutex<u32>>) {
            let attempts = Arc::new(Mutex::new(0));
            let backend = Self {
                attempts: Arc::clone(&attempts),
            };
            (backend, attempts)
        }
    }

    #[async_trait]
    impl NotificationBackend for BrokenBackend {
        async fn publish(
            &mut self,
            _id: u32,
            _payload: &NotificationPayload,
        ) -> Result<(), NotifyError> {
            *self.attempts.lock().unwrap() += 1;
            Err(NotifyError::Backend("bus unreachable".to_string()))
        }

        async fn close(&mut self, _id: u32) {}
    }
}
