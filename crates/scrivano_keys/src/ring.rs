//! Ordered key ring with a clamped, persisted cursor.

use scrivano_storage::{SnapshotKey, SnapshotStore};
use tracing::{debug, warn};

/// Ordered credential list with a sticky current index.
///
/// # Examples
///
/// ```
/// use scrivano_keys::KeyRing;
///
/// let mut ring = KeyRing::new(vec!["key-a".to_string(), "key-b".to_string()]);
/// assert_eq!(ring.current_index(), 0);
/// ring.advance();
/// assert_eq!(ring.current_index(), 1);
/// ring.advance();
/// assert_eq!(ring.current_index(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct KeyRing {
    keys: Vec<String>,
    index: usize,
    store: Option<SnapshotStore>,
}

impl KeyRing {
    /// Creates an in-memory ring (no persistence) starting at index 0.
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            index: 0,
            store: None,
        }
    }

    /// Creates a ring backed by the snapshot store, loading the key list
    /// and the stored cursor.
    pub fn with_store(store: SnapshotStore) -> Self {
        let keys: Vec<String> = store.load(SnapshotKey::Credentials);
        let index: usize = store.load(SnapshotKey::CredentialIndex);
        debug!(keys = keys.len(), index, "Loaded key ring");
        Self {
            keys,
            index,
            store: Some(store),
        }
    }

    /// The ordered key list.
    pub fn list(&self) -> &[String] {
        &self.keys
    }

    /// Number of keys in the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the ring holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The current index, clamped to `[0, len)`.
    ///
    /// Out-of-range stored values (e.g. after a key deletion) read as 0.
    pub fn current_index(&self) -> usize {
        if self.index >= self.keys.len() { 0 } else { self.index }
    }

    /// The key at `index`, if in range.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    /// Moves the cursor to the next key, wrapping around; no-op on an
    /// empty ring.
    pub fn advance(&mut self) {
        if self.keys.is_empty() {
            return;
        }
        self.index = (self.current_index() + 1) % self.keys.len();
        self.persist_index();
    }

    /// Pins the cursor to `index`.
    ///
    /// Called by the access layer after a successful call so the next
    /// invocation starts at the key that worked, including after a
    /// process restart.
    pub fn remember(&mut self, index: usize) {
        self.index = index;
        self.persist_index();
    }

    /// Appends a key and persists the list.
    pub fn add_key(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
        self.persist_keys();
    }

    /// Removes the key at `index` and persists the list; the cursor
    /// re-clamps on the next read.
    pub fn remove_key(&mut self, index: usize) -> Option<String> {
        if index >= self.keys.len() {
            return None;
        }
        let removed = self.keys.remove(index);
        self.persist_keys();
        Some(removed)
    }

    fn persist_index(&self) {
        if let Some(store) = &self.store
            && let Err(e) = store.save(SnapshotKey::CredentialIndex, &self.index)
        {
            // A lost cursor only costs stickiness, never correctness.
            warn!(error = %e, "Failed to persist credential index");
        }
    }

    fn persist_keys(&self) {
        if let Some(store) = &self.store
            && let Err(e) = store.save(SnapshotKey::Credentials, &self.keys)
        {
            warn!(error = %e, "Failed to persist credential list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> KeyRing {
        KeyRing::new(vec![
            "key-a".to_string(),
            "key-b".to_string(),
            "key-c".to_string(),
        ])
    }

    #[test]
    fn empty_ring_reads_index_zero() {
        let ring = KeyRing::new(vec![]);
        assert!(ring.is_empty());
        assert_eq!(ring.current_index(), 0);
        assert_eq!(ring.key_at(0), None);
    }

    #[test]
    fn out_of_range_cursor_clamps_to_zero() {
        let mut ring = ring();
        ring.remember(2);
        assert_eq!(ring.current_index(), 2);

        ring.remove_key(2);
        assert_eq!(ring.current_index(), 0);
    }

    #[test]
    fn advance_wraps_around() {
        let mut ring = ring();
        ring.advance();
        ring.advance();
        assert_eq!(ring.current_index(), 2);
        ring.advance();
        assert_eq!(ring.current_index(), 0);
    }

    #[test]
    fn cursor_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = scrivano_storage::SnapshotStore::new(dir.path()).unwrap();

        let mut ring = KeyRing::with_store(store.clone());
        ring.add_key("key-a");
        ring.add_key("key-b");
        ring.remember(1);

        let reloaded = KeyRing::with_store(store);
        assert_eq!(reloaded.list().len(), 2);
        assert_eq!(reloaded.current_index(), 1);
    }
}
