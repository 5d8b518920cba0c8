//! Session-scoped state.
//!
//! # Data Flow
//! ```text
//! First successful poll of a session
//!     → suppression.rs sets the flag
//!     → store.rs persists it (memory or <dir>/<session>.json)
//!
//! Later monitor instances in the same session
//!     → read the flag before showing a first-connect toast
//! ```
//!
//! # Design Decisions
//! - The store is an injected capability, never a global
//! - Flag writes are idempotent; no locking beyond the map's own
//! - A failing store degrades to "flag not set", never to an error

pub mod store;
pub mod suppression;

use std::sync::Arc;

use crate::config::SessionConfig;

pub use store::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
pub use suppression::{SuppressionFlag, SUPPRESSION_KEY};

/// Build the session store described by the configuration.
///
/// A file store needs a session id to be joinable; without one the session
/// lives only as long as the process, so memory is used instead.
pub fn open_store(config: &SessionConfig) -> Result<Arc<dyn SessionStore>, SessionError> {
    match (&config.store_dir, &config.session_id) {
        (Some(dir), Some(session_id)) => {
            let store = FileSessionStore::open(dir, session_id)?;
            tracing::info!(session_id = %session_id, path = ?store.path(), "Using file session store");
            Ok(Arc::new(store))
        }
        (Some(dir), None) => {
            tracing::warn!(
                path = ?dir,
                "No session id given; session state will not outlive this process"
            );
            Ok(Arc::new(MemorySessionStore::new()))
        }
        (None, _) => {
            tracing::info!("Using in-memory session store");
            Ok(Arc::new(MemorySessionStore::new()))
        }
    }
}
