//! Banner selection and connection hints.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;
use url::{Host, Url};

use crate::config::ApiConfig;
use crate::health::state::MonitorSnapshot;

/// Contextual advice shown with the error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionHint {
    /// No base configured; requests go to the dashboard's own origin.
    SameOrigin,
    /// Base points at this machine, unreachable from a deployed dashboard.
    Loopback,
    /// Any other host.
    Remote,
}

impl ConnectionHint {
    pub fn for_base(base_url: &str) -> Self {
        let base = base_url.trim();
        if base.is_empty() {
            return ConnectionHint::SameOrigin;
        }
        match Url::parse(base) {
            Ok(url) if is_loopback(&url) => ConnectionHint::Loopback,
            _ => ConnectionHint::Remote,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ConnectionHint::SameOrigin => {
                "No API base is configured, so requests go to the dashboard's own origin. \
                 Set AUTOCOMPLY_API_BASE if the backend runs elsewhere."
            }
            ConnectionHint::Loopback => {
                "The API base points at localhost. A local backend is only reachable from a \
                 dashboard running on the same machine, not from a deployed one."
            }
            ConnectionHint::Remote => {
                "Check that the backend is running and that the API base URL is correct."
            }
        }
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => ip.is_loopback() || ip.is_unspecified(),
        Some(Host::Ipv6(ip)) => {
            let ip = IpAddr::V6(ip);
            ip.is_loopback() || ip.is_unspecified()
        }
        None => false,
    }
}

/// The three mutually exclusive visual states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Banner {
    Nothing,
    Success { api_base: String },
    Error { api_base: String, hint: ConnectionHint },
}

impl Banner {
    /// Pick the surface to show for a snapshot.
    pub fn render(snapshot: &MonitorSnapshot, api: &ApiConfig) -> Self {
        if snapshot.health.is_unresolved() {
            return Banner::Nothing;
        }
        let api_base = api.display_base().to_string();
        if snapshot.visibility.error_visible {
            Banner::Error {
                api_base,
                hint: ConnectionHint::for_base(&api.base_url),
            }
        } else if snapshot.visibility.success_visible {
            Banner::Success { api_base }
        } else {
            Banner::Nothing
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Banner::Nothing)
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Banner::Nothing => Ok(()),
            Banner::Success { api_base } => {
                writeln!(f, "[ok] Connected to the AutoComply backend")?;
                writeln!(f, "     API base: {}", api_base)?;
                write!(f, "     (press 's' to dismiss)")
            }
            Banner::Error { api_base, hint } => {
                writeln!(f, "[!!] Cannot reach the AutoComply backend")?;
                writeln!(f, "     API base: {}", api_base)?;
                writeln!(f, "     {}", hint.message())?;
                write!(f, "     (press 'e' to dismiss)")
            }
        }
    }
}
