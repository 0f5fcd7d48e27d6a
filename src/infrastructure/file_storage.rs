// Durable storage adapters for the persisted state subset
use crate::application::state_storage::StateStorage;
use crate::domain::state::PersistedState;
use anyhow::Context;
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Fixed namespace under which the persisted subset is stored.
pub const STORAGE_NAMESPACE: &str = "dashboard-storage";

/// JSON blob storage at `<dir>/dashboard-storage.json`.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{STORAGE_NAMESPACE}.json")),
        }
    }
}

impl StateStorage for FileStorage {
    fn load(&self) -> anyhow::Result<Option<PersistedState>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).context(format!("failed to read {}", self.path.display()));
            }
        };
        let state = serde_json::from_str(&raw)
            .context(format!("failed to decode {}", self.path.display()))?;
        Ok(Some(state))
    }

    fn store(&self, state: &PersistedState) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context(format!("failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(state).context("failed to encode state")?;
        fs::write(&self.path, raw).context(format!("failed to write {}", self.path.display()))
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Option<PersistedState>>,
}

impl MemoryStorage {
    pub fn snapshot(&self) -> Option<PersistedState> {
        self.inner.lock().clone()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> anyhow::Result<Option<PersistedState>> {
        Ok(self.inner.lock().clone())
    }

    fn store(&self, state: &PersistedState) -> anyhow::Result<()> {
        *self.inner.lock() = Some(state.clone());
        Ok(())
    }
}
