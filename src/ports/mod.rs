//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the domain and implemented by adapters in the
//! infrastructure layer.

pub mod observer;
pub mod table_store;

pub use observer::Observer;
pub use table_store::TableStore;
