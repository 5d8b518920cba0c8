//! Compact connection indicator for the dashboard header.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::health::state::{HealthState, MonitorSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    pub health: HealthState,
    pub last_checked: Option<DateTime<Utc>>,
}

impl StatusIndicator {
    pub fn from_snapshot(snapshot: &MonitorSnapshot) -> Self {
        Self {
            health: snapshot.health,
            last_checked: snapshot.last_checked,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.health {
            HealthState::Unknown | HealthState::Checking => "Checking…",
            HealthState::Healthy => "Connected",
            HealthState::Unhealthy => "Disconnected",
        }
    }
}

impl fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())?;
        if let Some(at) = self.last_checked {
            write!(f, " · last checked {} UTC", at.format("%H:%M:%S"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_labels() {
        let mut snap = MonitorSnapshot::default();
        assert_eq!(StatusIndicator::from_snapshot(&snap).label(), "Checking…");

        snap.health = HealthState::Healthy;
        assert_eq!(StatusIndicator::from_snapshot(&snap).label(), "Connected");

        snap.health = HealthState::Unhealthy;
        assert_eq!(StatusIndicator::from_snapshot(&snap).label(), "Disconnected");
    }

    #[test]
    fn test_display_with_last_checked() {
        let indicator = StatusIndicator {
            health: HealthState::Healthy,
            last_checked: Utc.with_ymd_and_hms(2024, 3, 9, 1, 2, 3).single(),
        };
        assert_eq!(indicator.to_string(), "Connected · last checked 01:02:03 UTC");
    }
}
