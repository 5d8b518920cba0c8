//! Connection health monitoring.
//!
//! # Data Flow
//! ```text
//! schedule.rs: tick now, then every interval
//!     → probe.rs: GET {base}/health, bounded by timeout
//!     → state.rs: transition rule (+ session suppression flag)
//!     → monitor.rs: publish snapshot, arm auto-hide timer
//! ```
//!
//! # Design Decisions
//! - Polls are interval-driven, not chained; the last result to resolve wins
//! - Every probe failure folds into Unhealthy, nothing propagates
//! - Releasing the monitor cancels the interval, in-flight polls and timers

pub mod monitor;
pub mod probe;
pub mod schedule;
pub mod state;

pub use monitor::{HealthMonitor, MonitorHandle, MonitorSettings};
pub use probe::{HealthProbe, HttpProbe, ProbeError};
pub use state::{HealthState, MonitorSnapshot, NotificationVisibility, PollResult};
