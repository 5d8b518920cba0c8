//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// API base baked in at build time, empty when the build did not set one.
pub const BUILD_API_BASE: &str = match option_env!("AUTOCOMPLY_API_BASE") {
    Some(base) => base,
    None => "",
};

/// Root configuration for the connection health monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Where the backend API lives.
    pub api: ApiConfig,

    /// Polling and notification timing.
    pub health_check: HealthCheckConfig,

    /// Session-scoped storage for the suppression flag.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend API location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL. Empty means "same origin, relative path".
    pub base_url: String,

    /// Origin the dashboard is served from; used when `base_url` is empty.
    pub origin: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: BUILD_API_BASE.to_string(),
            origin: "http://127.0.0.1:8000".to_string(),
        }
    }
}

impl ApiConfig {
    /// Base URL requests are actually sent to.
    pub fn effective_base(&self) -> &str {
        if self.base_url.trim().is_empty() {
            &self.origin
        } else {
            &self.base_url
        }
    }

    /// Base URL as shown to the user in banners.
    pub fn display_base(&self) -> &str {
        if self.base_url.trim().is_empty() {
            "(same origin)"
        } else {
            &self.base_url
        }
    }
}

/// Which health route the deployment exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthEndpoint {
    /// `GET {base}/health`
    #[default]
    Root,
    /// `GET {base}/workflow/health`
    Workflow,
}

impl HealthEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            HealthEndpoint::Root => "/health",
            HealthEndpoint::Workflow => "/workflow/health",
        }
    }
}

/// What a failed poll does to an error banner the user already dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDismissPolicy {
    /// Every failed poll shows the error banner again.
    #[default]
    ReshowOnFailure,
    /// A dismissed banner stays hidden until the backend recovers.
    HoldUntilRecovered,
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Health route variant.
    pub endpoint: HealthEndpoint,

    /// Poll interval in milliseconds.
    pub interval_ms: u64,

    /// Bound on a single poll in milliseconds.
    pub timeout_ms: u64,

    /// How long the success toast stays up in milliseconds.
    pub success_display_ms: u64,

    /// Behavior of dismissed error banners while still unhealthy.
    pub error_dismiss: ErrorDismissPolicy,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            endpoint: HealthEndpoint::Root,
            interval_ms: 30_000,
            timeout_ms: 3_000,
            success_display_ms: 3_500,
            error_dismiss: ErrorDismissPolicy::ReshowOnFailure,
        }
    }
}

impl HealthCheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}

/// Session storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory for file-backed session state. In-memory when unset.
    pub store_dir: Option<PathBuf>,

    /// Session to join. Without one, `store_dir` is ignored and the
    /// session lasts as long as the process.
    pub session_id: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
