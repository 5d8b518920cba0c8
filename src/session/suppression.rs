//! The "connected" notification suppression flag.

use std::sync::Arc;

use crate::session::store::SessionStore;

/// Fixed key identifying the flag in the session store.
pub const SUPPRESSION_KEY: &str = "autocomply.backend_connected_shown";

const SET_VALUE: &str = "true";

/// Marks that the first-connect success toast was already shown this session.
#[derive(Clone)]
pub struct SuppressionFlag {
    store: Arc<dyn SessionStore>,
}

impl SuppressionFlag {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn is_set(&self) -> bool {
        self.store.get(SUPPRESSION_KEY).as_deref() == Some(SET_VALUE)
    }

    /// Set the flag. Idempotent; a failing store is logged and ignored.
    pub fn set(&self) {
        if let Err(e) = self.store.set(SUPPRESSION_KEY, SET_VALUE) {
            tracing::warn!(error = %e, "Failed to persist suppression flag");
        }
    }
}

impl std::fmt::Debug for SuppressionFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuppressionFlag")
            .field("set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{MemorySessionStore, SessionError};

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), SessionError> {
            Err(std::io::Error::other("quota exceeded").into())
        }
    }

    #[test]
    fn test_flag_starts_unset() {
        let flag = SuppressionFlag::new(Arc::new(MemorySessionStore::new()));
        assert!(!flag.is_set());
    }

    #[test]
    fn test_set_is_idempotent() {
        let store = MemorySessionStore::new();
        let flag = SuppressionFlag::new(Arc::new(store.clone()));

        flag.set();
        let after_once = store.get(SUPPRESSION_KEY);
        flag.set();

        assert!(flag.is_set());
        assert_eq!(store.get(SUPPRESSION_KEY), after_once);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_flag_shared_across_instances() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        SuppressionFlag::new(store.clone()).set();
        assert!(SuppressionFlag::new(store).is_set());
    }

    #[test]
    fn test_unrelated_value_does_not_count() {
        let store = MemorySessionStore::new();
        store.set(SUPPRESSION_KEY, "false").unwrap();
        assert!(!SuppressionFlag::new(Arc::new(store)).is_set());
    }

    #[test]
    fn test_broken_store_never_panics() {
        let flag = SuppressionFlag::new(Arc::new(BrokenStore));
        flag.set();
        assert!(!flag.is_set());
    }
}
