//! Session-scoped key-value storage.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

/// Errors raised by a session store write.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value storage scoped to one browsing session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
}

/// Process-lifetime session store.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Session store mirrored to `<dir>/<session_id>.json`.
///
/// Monitors started with the same session id share state across process
/// restarts until [`FileSessionStore::end_session`] removes the file.
#[derive(Clone)]
pub struct FileSessionStore {
    inner: Arc<DashMap<String, String>>,
    path: PathBuf,
    session_id: String,
}

impl FileSessionStore {
    /// Open the session file, loading existing entries if present.
    pub fn open(dir: &Path, session_id: &str) -> Result<Self, SessionError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", session_id));
        let store = Self {
            inner: Arc::new(DashMap::new()),
            path,
            session_id: session_id.to_string(),
        };

        if store.path.exists() {
            match Self::load(&store.path) {
                Ok(map) => {
                    for (k, v) in map {
                        store.inner.insert(k, v);
                    }
                    tracing::debug!(
                        session_id = %store.session_id,
                        entries = store.inner.len(),
                        "Loaded session state"
                    );
                }
                Err(e) => tracing::warn!(
                    session_id = %store.session_id,
                    path = ?store.path,
                    error = %e,
                    "Unreadable session state, starting empty"
                ),
            }
        }
        Ok(store)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// End the session: forget every entry and remove the backing file.
    pub fn end_session(&self) -> Result<(), SessionError> {
        self.inner.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tracing::info!(session_id = %self.session_id, "Session ended");
        Ok(())
    }

    fn load(path: &Path) -> Result<HashMap<String, String>, SessionError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write to `<id>.json.tmp`, then rename over the session file.
    fn save(&self) -> Result<(), SessionError> {
        let map: HashMap<_, _> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, &map)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let unchanged = self
            .inner
            .insert(key.to_string(), value.to_string())
            .is_some_and(|prev| prev == value);
        if unchanged {
            return Ok(());
        }
        self.save()
    }
}
