//! File-backed location store
//!
//! State lives in the XDG data directory (~/.local/share/delivery-locator/).
//! Each save writes a temp file and renames it over the old one, so readers
//! never see a half-written record.

use crate::constants::storage::{APP_DIR_NAME, LOCATION_STATE_FILE};
use crate::error::{Error, Result};
use crate::store::{LocationStore, PersistedLocationState};
use std::fs;
use std::path::{Path, PathBuf};

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileLocationStore {
    path: PathBuf,
}

impl FileLocationStore {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Store("Could not determine data directory".to_string()))
    }

    /// Store at the default path
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: Self::data_dir()?.join(LOCATION_STATE_FILE),
        })
    }

    /// Store at a specific path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `path` when given, else the default path
    pub fn from_option(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::at(path)),
            None => Self::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| LOCATION_STATE_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LocationStore for FileLocationStore {
    fn load(&self) -> Result<PersistedLocationState> {
        if !self.path.exists() {
            return Ok(PersistedLocationState::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::Store(format!("Failed to read location state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Store(format!("Failed to parse location state: {}", e)))
    }

    fn save(&self, state: &PersistedLocationState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Store(format!("Failed to create data directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(state)
            .map_err(|e| Error::Store(format!("Failed to serialize location state: {}", e)))?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, content)
            .map_err(|e| Error::Store(format!("Failed to write location state: {}", e)))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| Error::Store(format!("Failed to replace location state: {}", e)))?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Store(format!("Failed to remove location state: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;
    use crate::record::LocationRecord;
    use tempfile::TempDir;

    fn create_test_store() -> (FileLocationStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileLocationStore::at(temp_dir.path().join("nested").join("location.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_missing_file_loads_default() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.load().unwrap(), PersistedLocationState::default());
    }

    #[test]
    fn test_save_and_fresh_load() {
        let (store, _temp) = create_test_store();
        let state = PersistedLocationState {
            last_record: Some(LocationRecord::degraded(Coordinate::new(12.9716, 77.5946))),
            setup_skipped: false,
        };

        store.save(&state).unwrap();

        let reopened = FileLocationStore::at(store.path());
        assert_eq!(reopened.load().unwrap(), state);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_save_replaces_previous_state() {
        let (store, _temp) = create_test_store();

        store
            .save(&PersistedLocationState {
                last_record: Some(LocationRecord::degraded(Coordinate::new(1.0, 1.0))),
                setup_skipped: false,
            })
            .unwrap();
        store
            .save(&PersistedLocationState {
                last_record: None,
                setup_skipped: true,
            })
            .unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.last_record.is_none());
        assert!(loaded.setup_skipped);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let (store, _temp) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(Error::Store(_))));
    }

    #[test]
    fn test_clear() {
        let (store, _temp) = create_test_store();
        store
            .save(&PersistedLocationState {
                last_record: None,
                setup_skipped: true,
            })
            .unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), PersistedLocationState::default());

        // Clearing twice is fine
        store.clear().unwrap();
    }
}
