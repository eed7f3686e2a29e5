//! File-backed implementation of the table store.
//!
//! The agent already hands over pretty-printed JSON, so this adapter writes
//! the bytes as they are. A missing file reads as "nothing stored".

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{Result, error::Error, ports::TableStore};

/// Store bound to a single JSON file on disk.
///
/// # Examples
///
/// ```no_run
/// use qsnake::adapters::JsonFileStore;
/// use qsnake::q_learning::{AgentConfig, TabularQAgent};
///
/// let store = JsonFileStore::new("qtable.json");
/// let agent = TabularQAgent::new(AgentConfig::default(), store)?;
///
/// // Train the agent...
///
/// agent.save()?;
/// # Ok::<(), qsnake::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for `path`. Nothing is touched until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableStore for JsonFileStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Io {
                operation: format!("read value table {:?}", self.path),
                source,
            }),
        }
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        fs::write(&self.path, bytes).map_err(|source| Error::Io {
            operation: format!("write value table {:?}", self.path),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("table.json"));

        store.write(b"[[0.5]]").expect("Failed to write");
        assert_eq!(store.read().expect("Failed to read"), Some(b"[[0.5]]".to_vec()));
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("absent.json"));
        assert_eq!(store.read().expect("Missing file should not error"), None);
    }

    #[test]
    fn test_write_to_invalid_path_returns_error() {
        let store = JsonFileStore::new("/invalid_dir_12345/table.json");
        let result = store.write(b"[]");
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
