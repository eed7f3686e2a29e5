//! Storage port for persisted value tables.
//!
//! The agent owns the JSON codec; a store only moves opaque bytes to and from
//! wherever it keeps them.

use crate::Result;

/// Port for reading and writing an encoded value table.
///
/// Each store is bound to a single location (a file, a key, ...) chosen when
/// it is built, so the agent never sees paths.
///
/// # Examples
///
/// ```
/// use qsnake::ports::TableStore;
///
/// fn has_saved_table<S: TableStore>(store: &S) -> qsnake::Result<bool> {
///     Ok(store.read()?.is_some())
/// }
/// ```
pub trait TableStore {
    /// Fetch the stored payload.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage exists but cannot be read.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be written.
    fn write(&self, bytes: &[u8]) -> Result<()>;
}
