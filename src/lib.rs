//! AutoComply backend connection health monitor.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod session;

pub use config::MonitorConfig;
pub use health::{HealthMonitor, MonitorHandle};
pub use lifecycle::ConsoleCommand;
