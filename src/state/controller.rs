//! Timer controller
//!
//! Root of the core: owns the tick schedule and the shared timer state,
//! consumes battery readings, and pushes every state change to the
//! notification presenter. The hosting process creates exactly one of
//! these and tears it down on shutdown.

use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::TimerConfig;
use crate::services::battery::BatteryReading;
use crate::services::notify::{self, NotificationPresenter};
use crate::state::timer_state::{Phase, TimerState};
use crate::tasks::tick_scheduler::TickScheduler;

/// Callback invoked with the elapsed tick count.
///
/// At most one listener is registered at a time; a new subscription
/// replaces the old one and the subscriber detaches with
/// [`TimerController::unsubscribe_tick`].
pub type TickListener = Box<dyn Fn(u64) + Send + 'static>;

pub struct TimerController {
    config: TimerConfig,
    state: Mutex<TimerState>,
    scheduler: Mutex<TickScheduler>,
    presenter: NotificationPresenter,
    tick_listener: Mutex<Option<TickListener>>,
    start_time: Instant,
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    // Handed to the tick schedule so it never keeps the controller alive.
    weak_self: Weak<TimerController>,
}

impl TimerController {
    /// Create a new idle controller
    pub fn new(config: TimerConfig, presenter: NotificationPresenter) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            config,
            state: Mutex::new(TimerState::new()),
            scheduler: Mutex::new(TickScheduler::new()),
            presenter,
            tick_listener: Mutex::new(None),
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            weak_self: Weak::clone(weak),
        })
    }

    /// Transition to `Running` and begin ticking.
    ///
    /// The current state is published immediately, before the first tick.
    /// Starting while already running keeps the existing schedule; the
    /// elapsed counter is never reset, so a restart resumes counting.
    pub async fn start(&self) -> Result<TimerState, String> {
        let snapshot = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("Failed to lock timer state: {}", e))?;
            if state.is_running() {
                debug!("start requested while already running; keeping existing schedule");
                return Ok(state.clone());
            }
            state.phase = Phase::Running;
            state.clone()
        };

        info!(elapsed = snapshot.elapsed_ticks, "starting timer");
        self.record_action(&self.config.start_action);
        self.presenter
            .publish(&notify::render(&snapshot, &self.config))
            .await;

        let weak = Weak::clone(&self.weak_self);
        let mut scheduler = self
            .scheduler
            .lock()
            .map_err(|e| format!("Failed to lock tick scheduler: {}", e))?;
        scheduler.start(move || {
            let controller = Weak::clone(&weak);
            async move {
                if let Some(controller) = controller.upgrade() {
                    controller.handle_tick().await;
                }
            }
        });

        Ok(snapshot)
    }

    /// Transition to `Idle` and cancel the tick schedule.
    ///
    /// Idempotent; the elapsed counter is frozen, not reset. A tick already
    /// in flight when this returns is dropped by the phase check in
    /// `handle_tick`.
    pub fn stop(&self) -> Result<TimerState, String> {
        let snapshot = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("Failed to lock timer state: {}", e))?;
            state.phase = Phase::Idle;
            state.clone()
        };

        self.scheduler
            .lock()
            .map_err(|e| format!("Failed to lock tick scheduler: {}", e))?
            .stop();

        info!(elapsed = snapshot.elapsed_ticks, "timer stopped");
        self.record_action(&self.config.stop_action);
        Ok(snapshot)
    }

    /// Entry point for action identifiers carried on the notification.
    ///
    /// The two configured identifiers resolve to `start`/`stop`; anything
    /// else, including no action at all, republishes the current state
    /// without changing it.
    pub async fn dispatch(&self, action: Option<&str>) -> Result<TimerState, String> {
        match action {
            Some(a) if a == self.config.start_action => self.start().await,
            Some(a) if a == self.config.stop_action => self.stop(),
            other => {
                if let Some(unknown) = other {
                    debug!(action = unknown, "unrecognized action; republishing state");
                }
                let snapshot = self.snapshot()?;
                self.presenter
                    .publish(&notify::render(&snapshot, &self.config))
                    .await;
                Ok(snapshot)
            }
        }
    }

    /// Register the external tick listener, replacing any previous one
    pub fn subscribe_tick(&self, listener: TickListener) {
        if let Ok(mut slot) = self.tick_listener.lock() {
            if slot.replace(listener).is_some() {
                debug!("tick listener replaced");
            }
        }
    }

    /// Detach the external tick listener; no-op when none is registered
    pub fn unsubscribe_tick(&self) {
        if let Ok(mut slot) = self.tick_listener.lock() {
            if slot.take().is_some() {
                debug!("tick listener detached");
            }
        }
    }

    /// One tick elapsed: bump the counter, publish, fan out to the listener
    pub(crate) async fn handle_tick(&self) {
        let (snapshot, elapsed) = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(e) => {
                    warn!("Failed to lock timer state: {}", e);
                    return;
                }
            };
            if !state.is_running() {
                debug!("tick arrived while idle; dropping");
                return;
            }
            let elapsed = state.record_tick();
            (state.clone(), elapsed)
        };

        self.presenter
            .publish(&notify::render(&snapshot, &self.config))
            .await;

        if let Ok(slot) = self.tick_listener.lock() {
            if let Some(listener) = slot.as_ref() {
                listener(elapsed);
            }
        }
    }

    /// Battery level changed: store the fraction and republish.
    ///
    /// Publishing happens even while idle so the visible battery line stays
    /// fresh. An unusable reading leaves the previous level untouched.
    pub(crate) async fn handle_battery(&self, reading: BatteryReading) {
        let Some(fraction) = reading.fraction() else {
            debug!(
                level = reading.level,
                scale = reading.scale,
                "unusable battery reading; keeping previous level"
            );
            return;
        };

        let snapshot = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(e) => {
                    warn!("Failed to lock timer state: {}", e);
                    return;
                }
            };
            state.set_battery_fraction(fraction);
            state.clone()
        };

        self.presenter
            .publish(&notify::render(&snapshot, &self.config))
            .await;
    }

    /// Current state, by value
    pub fn snapshot(&self) -> Result<TimerState, String> {
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Stop the schedule, detach listeners, withdraw the notification
    pub async fn teardown(&self) {
        info!("tearing down timer controller");
        if let Ok(mut scheduler) = self.scheduler.lock() {
            scheduler.stop();
        }
        if let Ok(mut state) = self.state.lock() {
            state.phase = Phase::Idle;
        }
        self.unsubscribe_tick();
        self.presenter.close().await;
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Controller uptime as a formatted string
    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        match (secs / 3600, (secs % 3600) / 60, secs % 60) {
            (0, 0, s) => format!("{}s", s),
            (0, m, s) => format!("{}m {}s", m, s),
            (h, m, s) => format!("{}h {}m {}s", h, m, s),
        }
    }

    /// Most recent action identifier and when it was handled
    pub fn last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let action = self.last_action.lock().ok().and_then(|a| a.clone());
        let time = self.last_action_time.lock().ok().and_then(|t| *t);
        (action, time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last) = self.last_action.lock() {
            *last = Some(action.to_string());
        }
        if let Ok(mut time) = self.last_action_time.lock() {
            *time = Some(Utc::now());
        }
    }
}
