//! Persisted location state
//!
//! Two keys survive a restart: the last resolved record and whether the user
//! skipped location setup. The resolver treats every write as best-effort.

pub mod file;

use crate::error::{Error, Result};
use crate::record::LocationRecord;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

pub use file::FileLocationStore;

/// Everything the store keeps between sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedLocationState {
    /// Last successfully resolved record
    #[serde(rename = "last_location", default)]
    pub last_record: Option<LocationRecord>,

    /// Whether the user chose to skip location setup
    #[serde(default)]
    pub setup_skipped: bool,
}

/// Key-value persistence for location state
pub trait LocationStore: Send + Sync {
    /// Load persisted state, defaulting when nothing was stored yet
    fn load(&self) -> Result<PersistedLocationState>;

    /// Replace persisted state
    fn save(&self, state: &PersistedLocationState) -> Result<()>;

    /// Drop everything (sign-out)
    fn clear(&self) -> Result<()> {
        self.save(&PersistedLocationState::default())
    }
}

/// In-process store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryLocationStore {
    state: Mutex<PersistedLocationState>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing state
    pub fn with_state(state: PersistedLocationState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl LocationStore for MemoryLocationStore {
    fn load(&self) -> Result<PersistedLocationState> {
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|_| Error::Store("memory store lock poisoned".to_string()))
    }

    fn save(&self, state: &PersistedLocationState) -> Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| Error::Store("memory store lock poisoned".to_string()))?;
        *guard = state.clone();
        Ok(())
    }
}
