//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (AUTOCOMPLY_API_BASE)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an absent file is a valid configuration
//! - The API base URL defaults to the value baked in at build time
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::ApiConfig;
pub use schema::ErrorDismissPolicy;
pub use schema::HealthCheckConfig;
pub use schema::HealthEndpoint;
pub use schema::MonitorConfig;
pub use schema::ObservabilityConfig;
pub use schema::SessionConfig;
