//! The running connection health monitor.
//!
//! # Responsibilities
//! - Poll the backend immediately, then on every interval tick
//! - Fold poll results into health state and notification visibility
//! - Expire the success toast after its display time
//! - Stop every timer and in-flight poll when released

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time;

use crate::config::{ErrorDismissPolicy, HealthCheckConfig};
use crate::health::probe::{poll, HealthProbe, PollOutcome};
use crate::health::schedule::{auto_hide_deadline, PollSchedule};
use crate::health::state::{decide, HealthState, MonitorSnapshot, Notification, PollResult};
use crate::observability::metrics;
use crate::session::SuppressionFlag;

/// Timing and policy knobs for one monitor.
#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub success_display: Duration,
    pub error_dismiss: ErrorDismissPolicy,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::from(&HealthCheckConfig::default())
    }
}

impl From<&HealthCheckConfig> for MonitorSettings {
    fn from(config: &HealthCheckConfig) -> Self {
        Self {
            interval: config.interval(),
            timeout: config.timeout(),
            success_display: config.success_display(),
            error_dismiss: config.error_dismiss,
        }
    }
}

/// A monitor that has not been started yet.
pub struct HealthMonitor<P> {
    probe: Arc<P>,
    flag: SuppressionFlag,
    settings: MonitorSettings,
}

impl<P: HealthProbe> HealthMonitor<P> {
    pub fn new(probe: P, flag: SuppressionFlag, settings: MonitorSettings) -> Self {
        Self {
            probe: Arc::new(probe),
            flag,
            settings,
        }
    }

    /// Start polling. Monitoring lasts as long as the returned handle.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(self) -> MonitorHandle {
        let (state, _) = watch::channel(MonitorSnapshot::default());
        let state = Arc::new(state);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tracing::info!(
            interval_ms = self.settings.interval.as_millis() as u64,
            timeout_ms = self.settings.timeout.as_millis() as u64,
            "Health monitor starting"
        );

        let driver = Driver {
            probe: self.probe,
            flag: self.flag,
            settings: self.settings,
            state: state.clone(),
        };
        let task = tokio::spawn(driver.run(shutdown_rx));

        MonitorHandle {
            state,
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

/// Scoped ownership of a running monitor.
///
/// Dropping the handle aborts the monitor; [`MonitorHandle::stop`] does the
/// same but waits for the driver to exit.
pub struct MonitorHandle {
    state: Arc<watch::Sender<MonitorSnapshot>>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.state.borrow().clone()
    }

    pub fn dismiss_success(&self) {
        if self.state.send_if_modified(MonitorSnapshot::dismiss_success) {
            tracing::debug!("Success notification dismissed");
        }
    }

    pub fn dismiss_error(&self) {
        if self.state.send_if_modified(MonitorSnapshot::dismiss_error) {
            tracing::debug!("Error notification dismissed");
        }
    }

    /// Stop polling and wait for the driver task to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        tracing::info!("Health monitor stopped");
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Driver<P> {
    probe: Arc<P>,
    flag: SuppressionFlag,
    settings: MonitorSettings,
    state: Arc<watch::Sender<MonitorSnapshot>>,
}

impl<P: HealthProbe> Driver<P> {
    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut schedule = PollSchedule::new(self.settings.interval);
        let mut polls: JoinSet<PollOutcome> = JoinSet::new();
        let mut timers: JoinSet<u64> = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::debug!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
                seq = schedule.tick() => {
                    self.state.send_if_modified(|s| {
                        if s.health == HealthState::Unknown {
                            s.health = HealthState::Checking;
                            true
                        } else {
                            false
                        }
                    });
                    let probe = self.probe.clone();
                    let timeout = self.settings.timeout;
                    polls.spawn(async move { poll(&*probe, timeout).await });
                    tracing::trace!(seq, in_flight = polls.len(), "Health poll issued");
                }
                Some(joined) = polls.join_next() => match joined {
                    Ok(outcome) => {
                        if let Some(epoch) = self.apply(&outcome.result) {
                            let deadline = auto_hide_deadline(self.settings.success_display);
                            timers.spawn(async move {
                                time::sleep_until(deadline).await;
                                epoch
                            });
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "Health poll task failed"),
                },
                Some(joined) = timers.join_next() => {
                    if let Ok(epoch) = joined {
                        if self.state.send_if_modified(|s| s.expire_success(epoch)) {
                            tracing::debug!(epoch, "Success notification auto-hidden");
                        }
                    }
                }
            }
        }

        polls.abort_all();
        timers.abort_all();
    }

    /// Apply one poll result. Returns the toast epoch to auto-hide, if any.
    fn apply(&self, result: &PollResult) -> Option<u64> {
        let already_shown = self.flag.is_set();
        let mut shown = None;

        self.state.send_modify(|s| {
            let previous = s.health;
            let error_was_visible = s.visibility.error_visible;
            let decision = decide(
                previous,
                result,
                already_shown,
                s.error_dismissed,
                self.settings.error_dismiss,
            );
            shown = s.apply(decision, result);

            if previous != s.health {
                tracing::info!(from = ?previous, to = ?s.health, "Backend health changed");
            }
            match decision.notification {
                Notification::ShowSuccess => metrics::record_notification("success"),
                Notification::ShowError if !error_was_visible => {
                    metrics::record_notification("error")
                }
                _ => {}
            }
        });

        if shown.is_some() {
            self.flag.set();
        }
        metrics::record_backend_health(result.succeeded);
        shown
    }
}
