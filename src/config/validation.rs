//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and URL shapes.
//! Every problem is reported, not just the first.

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::MonitorConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.api.base_url.trim().is_empty() {
        if let Err(msg) = check_http_url(&config.api.base_url) {
            errors.push(ValidationError::new("api.base_url", msg));
        }
    }
    if let Err(msg) = check_http_url(&config.api.origin) {
        errors.push(ValidationError::new("api.origin", msg));
    }

    let hc = &config.health_check;
    if hc.interval_ms == 0 {
        errors.push(ValidationError::new("health_check.interval_ms", "must be greater than 0"));
    }
    if hc.timeout_ms == 0 {
        errors.push(ValidationError::new("health_check.timeout_ms", "must be greater than 0"));
    }
    if hc.success_display_ms == 0 {
        errors.push(ValidationError::new(
            "health_check.success_display_ms",
            "must be greater than 0",
        ));
    }

    if let Some(id) = &config.session.session_id {
        let valid = !id.is_empty()
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            errors.push(ValidationError::new(
                "session.session_id",
                "must be non-empty and contain only [A-Za-z0-9_-]",
            ));
        }
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("'{}' is not a valid URL: {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
