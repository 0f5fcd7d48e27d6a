// Durable-sync port for the persisted state subset
use crate::domain::state::PersistedState;

/// Key-value blob storage for the persisted subset of dashboard state.
/// Injected into the store so persistence can be swapped or disabled.
pub trait StateStorage: Send + Sync {
    /// Read the previously persisted subset. A missing blob is `Ok(None)`,
    /// not an error; the store falls back to defaults.
    fn load(&self) -> anyhow::Result<Option<PersistedState>>;

    /// Write the persisted subset, replacing any previous value.
    fn store(&self, state: &PersistedState) -> anyhow::Result<()>;
}
