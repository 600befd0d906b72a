//! Whole-value snapshot store.

use derive_getters::Getters;
use scrivano_error::{ScrivanoResult, StorageError, StorageErrorKind};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Well-known snapshot keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    /// The whole job collection
    Jobs,
    /// The ordered credential list
    Credentials,
    /// The current-credential index
    CredentialIndex,
    /// The UI collaborator's authentication flag
    Auth,
}

impl SnapshotKey {
    fn file_name(self) -> &'static str {
        match self {
            SnapshotKey::Jobs => "jobs.json",
            SnapshotKey::Credentials => "credentials.json",
            SnapshotKey::CredentialIndex => "credential_index.json",
            SnapshotKey::Auth => "auth.json",
        }
    }
}

/// Persists JSON-encoded snapshots under a data directory.
///
/// Each key maps to one file holding the complete value; writes replace the
/// whole file. Reads never fail: absence or a corrupt file yields the
/// default value for the key's type.
///
/// # Examples
///
/// ```no_run
/// use scrivano_storage::{SnapshotKey, SnapshotStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SnapshotStore::new("./data")?;
/// let credentials: Vec<String> = store.load(SnapshotKey::Credentials);
/// store.save(SnapshotKey::Credentials, &credentials)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Getters)]
pub struct SnapshotStore {
    /// Base directory for snapshot files
    data_dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a snapshot store rooted at `data_dir`, creating the
    /// directory if needed.
    pub fn new(data_dir: impl AsRef<Path>) -> ScrivanoResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(e.to_string()))
            })?;
        }

        debug!(path = %data_dir.display(), "Initialized snapshot store");
        Ok(Self { data_dir })
    }

    fn key_path(&self, key: SnapshotKey) -> PathBuf {
        self.data_dir.join(key.file_name())
    }

    /// Loads the snapshot for `key`, falling back to the default value when
    /// the file is absent or unreadable.
    pub fn load<T: DeserializeOwned + Default>(&self, key: SnapshotKey) -> T {
        let path = self.key_path(key);

        if !path.exists() {
            debug!(key = ?key, "No snapshot file, returning default");
            return T::default();
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(key = ?key, error = %e, "Failed to read snapshot, returning default");
                return T::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => {
                debug!(key = ?key, bytes = contents.len(), "Loaded snapshot");
                value
            }
            Err(e) => {
                warn!(key = ?key, error = %e, "Failed to parse snapshot, returning default");
                T::default()
            }
        }
    }

    /// Saves the whole value for `key`, replacing any previous snapshot.
    pub fn save<T: Serialize>(&self, key: SnapshotKey, value: &T) -> ScrivanoResult<()> {
        let path = self.key_path(key);

        let contents = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::new(StorageErrorKind::Encode(e.to_string())))?;

        std::fs::write(&path, &contents)
            .map_err(|e| StorageError::new(StorageErrorKind::FileWrite(e.to_string())))?;

        debug!(key = ?key, bytes = contents.len(), "Saved snapshot");
        Ok(())
    }
}
