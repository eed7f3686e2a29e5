//! In-memory table store for testing.
//!
//! This adapter keeps the encoded table in a shared buffer, enabling fast
//! tests without any file system I/O.

use std::sync::{Arc, Mutex};

use crate::{Result, error::Error, ports::TableStore};

/// In-memory store for testing.
///
/// # Examples
///
/// ```
/// use qsnake::adapters::InMemoryStore;
/// use qsnake::ports::TableStore;
///
/// let store = InMemoryStore::new();
/// store.write(b"[[0.0]]")?;
/// assert_eq!(store.read()?.as_deref(), Some(&b"[[0.0]]"[..]));
/// # Ok::<(), qsnake::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying buffer, so a test can hand one clone
/// to an agent and inspect what it saved through another.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    storage: Arc<Mutex<Option<Vec<u8>>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `bytes`.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            storage: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Copy of the stored payload, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.storage.lock().ok().and_then(|guard| guard.clone())
    }

    /// Whether anything has been written.
    pub fn is_empty(&self) -> bool {
        self.storage.lock().map_or(true, |guard| guard.is_none())
    }

    /// Drop the stored payload.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.storage.lock() {
            *guard = None;
        }
    }
}

fn poisoned() -> Error {
    Error::Io {
        operation: "access in-memory table store".to_string(),
        source: std::io::Error::other("storage lock poisoned"),
    }
}

impl TableStore for InMemoryStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        let guard = self.storage.lock().map_err(|_| poisoned())?;
        Ok(guard.clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        let mut guard = self.storage.lock().map_err(|_| poisoned())?;
        *guard = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_write_and_read() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.read().unwrap(), None);

        store.write(b"[[1.0]]").unwrap();
        assert!(!store.is_empty());
        assert_eq!(store.read().unwrap(), Some(b"[[1.0]]".to_vec()));
    }

    #[test]
    fn test_write_replaces_payload() {
        let store = InMemoryStore::with_contents("first");
        store.write(b"second").unwrap();
        assert_eq!(store.contents(), Some(b"second".to_vec()));
    }

    #[test]
    fn test_clear() {
        let store = InMemoryStore::with_contents("payload");
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clone_shares_storage() {
        let store1 = InMemoryStore::new();
        let store2 = store1.clone();

        store1.write(b"shared").unwrap();
        assert_eq!(store2.contents(), Some(b"shared".to_vec()));
    }
}
