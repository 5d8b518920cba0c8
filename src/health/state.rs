//! Connection health state machine.
//!
//! # States
//! - Unknown: no poll has resolved yet
//! - Checking: the first poll is in flight
//! - Healthy: the last applied poll succeeded
//! - Unhealthy: the last applied poll failed
//!
//! # State Transitions
//! ```text
//! Unknown/Checking → Healthy: poll succeeds
//! Unknown/Checking → Unhealthy: poll fails
//! Healthy → Unhealthy: poll fails
//! Unhealthy → Healthy: poll succeeds
//! ```
//!
//! # Notification Rules
//! - A success toast is shown on Unhealthy → Healthy, always
//! - A success toast is shown on Unknown → Healthy only if the session has not
//!   seen one yet
//! - Any success clears the error banner; any failure raises it

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ErrorDismissPolicy;

/// Backend reachability as seen by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    #[default]
    Unknown,
    Checking,
    Healthy,
    Unhealthy,
}

impl HealthState {
    /// True until the first poll result has been applied.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, HealthState::Unknown | HealthState::Checking)
    }
}

/// Outcome of one health poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PollResult {
    pub succeeded: bool,
    pub observed_at: DateTime<Utc>,
}

impl PollResult {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            observed_at: Utc::now(),
        }
    }

    pub fn failure() -> Self {
        Self {
            succeeded: false,
            observed_at: Utc::now(),
        }
    }
}

/// Visibility of the two notification surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NotificationVisibility {
    pub success_visible: bool,
    pub error_visible: bool,
}

/// What a poll result does to the notification surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Show the success toast and mark the session as having seen it.
    ShowSuccess,
    /// Healthy, but the toast is suppressed.
    QuietSuccess,
    /// Raise the error banner.
    ShowError,
    /// Unhealthy, but the user's dismissal is being honored.
    QuietFailure,
}

/// Result of the transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub next: HealthState,
    pub notification: Notification,
}

/// The transition rule: previous state + poll result + session flag → decision.
///
/// `error_dismissed` is whether the user dismissed the error banner since the
/// last success; it only matters under [`ErrorDismissPolicy::HoldUntilRecovered`].
pub fn decide(
    previous: HealthState,
    result: &PollResult,
    already_shown: bool,
    error_dismissed: bool,
    policy: ErrorDismissPolicy,
) -> Decision {
    if result.succeeded {
        let show = match previous {
            HealthState::Unhealthy => true,
            HealthState::Unknown | HealthState::Checking => !already_shown,
            HealthState::Healthy => false,
        };
        Decision {
            next: HealthState::Healthy,
            notification: if show {
                Notification::ShowSuccess
            } else {
                Notification::QuietSuccess
            },
        }
    } else {
        let hold = error_dismissed && policy == ErrorDismissPolicy::HoldUntilRecovered;
        Decision {
            next: HealthState::Unhealthy,
            notification: if hold {
                Notification::QuietFailure
            } else {
                Notification::ShowError
            },
        }
    }
}

/// In-memory state of one monitor instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorSnapshot {
    pub health: HealthState,
    pub visibility: NotificationVisibility,
    pub last_checked: Option<DateTime<Utc>>,
    pub polls_applied: u64,
    /// Incremented each time the success toast is shown.
    #[serde(skip)]
    pub(crate) success_epoch: u64,
    /// User dismissed the error banner since the last success.
    #[serde(skip)]
    pub(crate) error_dismissed: bool,
}

impl MonitorSnapshot {
    /// Epoch of the most recently shown success toast.
    pub fn success_epoch(&self) -> u64 {
        self.success_epoch
    }

    /// Whether the error banner was dismissed since the last success.
    pub fn error_dismissed(&self) -> bool {
        self.error_dismissed
    }

    /// Apply a decision. Returns the epoch to auto-hide when a toast was shown.
    pub fn apply(&mut self, decision: Decision, result: &PollResult) -> Option<u64> {
        self.health = decision.next;
        self.last_checked = Some(result.observed_at);
        self.polls_applied += 1;

        match decision.notification {
            Notification::ShowSuccess => {
                self.visibility.success_visible = true;
                self.visibility.error_visible = false;
                self.error_dismissed = false;
                self.success_epoch += 1;
                Some(self.success_epoch)
            }
            Notification::QuietSuccess => {
                self.visibility.error_visible = false;
                self.error_dismissed = false;
                None
            }
            Notification::ShowError => {
                self.visibility.success_visible = false;
                self.visibility.error_visible = true;
                None
            }
            Notification::QuietFailure => {
                self.visibility.success_visible = false;
                None
            }
        }
    }

    /// Auto-hide expiry. Only the timer for the current toast may hide it.
    pub fn expire_success(&mut self, epoch: u64) -> bool {
        if epoch == self.success_epoch && self.visibility.success_visible {
            self.visibility.success_visible = false;
            true
        } else {
            false
        }
    }

    pub fn dismiss_success(&mut self) -> bool {
        std::mem::replace(&mut self.visibility.success_visible, false)
    }

    pub fn dismiss_error(&mut self) -> bool {
        let was_visible = std::mem::replace(&mut self.visibility.error_visible, false);
        if was_visible {
            self.error_dismissed = true;
        }
        was_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESHOW: ErrorDismissPolicy = ErrorDismissPolicy::ReshowOnFailure;
    const HOLD: ErrorDismissPolicy = ErrorDismissPolicy::HoldUntilRecovered;

    fn ok() -> PollResult {
        PollResult::success()
    }

    fn fail() -> PollResult {
        PollResult::failure()
    }

    #[test]
    fn test_first_success_fresh_session_shows_toast() {
        let d = decide(HealthState::Unknown, &ok(), false, false, RESHOW);
        assert_eq!(d.next, HealthState::Healthy);
        assert_eq!(d.notification, Notification::ShowSuccess);

        let d = decide(HealthState::Checking, &ok(), false, false, RESHOW);
        assert_eq!(d.notification, Notification::ShowSuccess);
    }

    #[test]
    fn test_first_success_suppressed_when_already_shown() {
        let d = decide(HealthState::Unknown, &ok(), true, false, RESHOW);
        assert_eq!(d.next, HealthState::Healthy);
        assert_eq!(d.notification, Notification::QuietSuccess);
    }

    #[test]
    fn test_recovery_always_shows_toast() {
        for already_shown in [false, true] {
            let d = decide(HealthState::Unhealthy, &ok(), already_shown, false, RESHOW);
            assert_eq!(d.notification, Notification::ShowSuccess);
        }
    }

    #[test]
    fn test_steady_healthy_is_quiet() {
        for already_shown in [false, true] {
            let d = decide(HealthState::Healthy, &ok(), already_shown, false, RESHOW);
            assert_eq!(d.notification, Notification::QuietSuccess);
        }
    }

    #[test]
    fn test_failure_from_any_state_raises_error() {
        for prev in [
            HealthState::Unknown,
            HealthState::Checking,
            HealthState::Healthy,
            HealthState::Unhealthy,
        ] {
            let d = decide(prev, &fail(), false, false, RESHOW);
            assert_eq!(d.next, HealthState::Unhealthy);
            assert_eq!(d.notification, Notification::ShowError);
        }
    }

    #[test]
    fn test_dismissed_error_policy() {
        let d = decide(HealthState::Unhealthy, &fail(), false, true, RESHOW);
        assert_eq!(d.notification, Notification::ShowError);

        let d = decide(HealthState::Unhealthy, &fail(), false, true, HOLD);
        assert_eq!(d.notification, Notification::QuietFailure);

        let d = decide(HealthState::Unhealthy, &fail(), false, false, HOLD);
        assert_eq!(d.notification, Notification::ShowError);
    }

    #[test]
    fn test_error_visible_tracks_latest_failure() {
        let mut snap = MonitorSnapshot::default();
        let outcomes = [false, false, true, false, true, true, false];

        for succeeded in outcomes {
            let result = if succeeded { ok() } else { fail() };
            let d = decide(snap.health, &result, true, snap.error_dismissed, RESHOW);
            snap.apply(d, &result);
            assert_eq!(snap.visibility.error_visible, !succeeded);
        }
        assert_eq!(snap.polls_applied, outcomes.len() as u64);
    }

    #[test]
    fn test_success_clears_error_and_failure_clears_success() {
        let mut snap = MonitorSnapshot::default();

        let r = fail();
        snap.apply(decide(snap.health, &r, false, false, RESHOW), &r);
        assert!(snap.visibility.error_visible);

        let r = ok();
        let epoch = snap.apply(decide(snap.health, &r, false, false, RESHOW), &r);
        assert_eq!(epoch, Some(1));
        assert!(snap.visibility.success_visible);
        assert!(!snap.visibility.error_visible);

        let r = fail();
        snap.apply(decide(snap.health, &r, true, false, RESHOW), &r);
        assert!(!snap.visibility.success_visible);
        assert!(snap.visibility.error_visible);
    }

    #[test]
    fn test_stale_auto_hide_is_ignored() {
        let mut snap = MonitorSnapshot::default();
        let r = ok();
        let first = snap.apply(decide(snap.health, &r, false, false, RESHOW), &r).unwrap();

        let r = fail();
        snap.apply(decide(snap.health, &r, true, false, RESHOW), &r);
        let r = ok();
        let second = snap.apply(decide(snap.health, &r, true, false, RESHOW), &r).unwrap();

        assert!(!snap.expire_success(first));
        assert!(snap.visibility.success_visible);
        assert!(snap.expire_success(second));
        assert!(!snap.visibility.success_visible);
    }

    #[test]
    fn test_dismiss_does_not_touch_health() {
        let mut snap = MonitorSnapshot::default();
        let r = fail();
        snap.apply(decide(snap.health, &r, false, false, RESHOW), &r);

        assert!(snap.dismiss_error());
        assert!(!snap.dismiss_error());
        assert_eq!(snap.health, HealthState::Unhealthy);
        assert!(snap.error_dismissed);
        assert!(!snap.dismiss_success());
    }

    #[test]
    fn test_bookkeeping_not_serialized() {
        let mut snap = MonitorSnapshot::default();
        let r = ok();
        snap.apply(decide(snap.health, &r, false, false, RESHOW), &r);
        assert_eq!(snap.success_epoch(), 1);

        let value = serde_json::to_value(&snap).unwrap();
        assert!(value.get("success_epoch").is_none());
        assert!(value.get("error_dismissed").is_none());
        assert_eq!(value["health"], "healthy");
        assert!(value["last_checked"].is_string());
    }
}
