//! Poll scheduling: fire now, then every interval.
//!
//! Built on Tokio's clock so tests drive it with a paused runtime
//! (`#[tokio::test(start_paused = true)]`) instead of real waits.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Fixed-interval schedule whose first tick is immediate.
#[derive(Debug)]
pub struct PollSchedule {
    ticker: Interval,
    ticks: u64,
}

impl PollSchedule {
    pub fn new(every: Duration) -> Self {
        let mut ticker = time::interval(every);
        // A stalled runtime fires once on resume, not a burst of catch-up polls.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { ticker, ticks: 0 }
    }

    /// Wait for the next tick; returns its sequence number starting at 0.
    pub async fn tick(&mut self) -> u64 {
        self.ticker.tick().await;
        let n = self.ticks;
        self.ticks += 1;
        n
    }

    pub fn period(&self) -> Duration {
        self.ticker.period()
    }
}

/// Deadline for a success toast shown now.
pub fn auto_hide_deadline(display_for: Duration) -> Instant {
    Instant::now() + display_for
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_is_immediate_then_periodic() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(Duration::from_secs(30));

        assert_eq!(schedule.tick().await, 0);
        assert_eq!(start.elapsed(), Duration::ZERO);

        assert_eq!(schedule.tick().await, 1);
        assert_eq!(start.elapsed(), Duration::from_secs(30));

        assert_eq!(schedule.tick().await, 2);
        assert_eq!(start.elapsed(), Duration::from_secs(60));
        assert_eq!(schedule.period(), Duration::from_secs(30));
    }
}
