//! Health probing.
//!
//! # Responsibilities
//! - Issue one health request against the backend
//! - Bound it with a timeout
//! - Normalize every failure to an unhealthy poll result

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use thiserror::Error;
use tokio::time;

use crate::config::{ApiConfig, HealthEndpoint};
use crate::health::state::PollResult;
use crate::observability::metrics;

/// Why a health probe failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Network failure, DNS failure, refused connection.
    #[error("transport error: {0}")]
    Transport(String),

    /// No response within the bound.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// A response arrived with a non-success status.
    #[error("unhealthy response: {0}")]
    UnhealthyResponse(StatusCode),

    /// The health URL could not be built from the configuration.
    #[error("invalid health URL: {0}")]
    InvalidUrl(String),
}

impl ProbeError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Transport(_) => "transport",
            ProbeError::Timeout(_) => "timeout",
            ProbeError::UnhealthyResponse(_) => "status",
            ProbeError::InvalidUrl(_) => "invalid_url",
        }
    }
}

/// One check of backend reachability.
pub trait HealthProbe: Send + Sync + 'static {
    fn check(&self) -> impl Future<Output = Result<(), ProbeError>> + Send;
}

/// Build `{base}{path}` without doubling slashes.
pub fn health_url(api: &ApiConfig, endpoint: HealthEndpoint) -> String {
    format!(
        "{}{}",
        api.effective_base().trim_end_matches('/'),
        endpoint.path()
    )
}

/// Probes the backend over HTTP; any 2xx is healthy.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(api: &ApiConfig, endpoint: HealthEndpoint) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("autocomply-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self::with_client(client, api, endpoint)
    }

    /// Use a preconfigured client (proxy settings, TLS roots).
    pub fn with_client(client: reqwest::Client, api: &ApiConfig, endpoint: HealthEndpoint) -> Self {
        Self {
            client,
            url: health_url(api, endpoint),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl HealthProbe for HttpProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_builder() {
                ProbeError::InvalidUrl(e.to_string())
            } else {
                ProbeError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProbeError::UnhealthyResponse(status))
        }
    }
}

/// Classified outcome of a poll, kept for logging.
#[derive(Debug)]
pub struct PollOutcome {
    pub result: PollResult,
    pub error: Option<ProbeError>,
    pub elapsed: Duration,
}

/// Run one probe with a bounded wait. Never fails.
pub async fn poll<P: HealthProbe>(probe: &P, timeout: Duration) -> PollOutcome {
    let started = Instant::now();

    let error = match time::timeout(timeout, probe.check()).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(_) => Some(ProbeError::Timeout(timeout)),
    };
    let elapsed = started.elapsed();

    let result = match &error {
        None => PollResult::success(),
        Some(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "Health check failed");
            PollResult::failure()
        }
    };

    metrics::record_poll(
        error.as_ref().map_or("success", ProbeError::kind),
        elapsed,
    );

    PollOutcome {
        result,
        error,
        elapsed,
    }
}
