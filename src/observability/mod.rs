//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Monitor and probes produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stderr / JSON log lines
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
