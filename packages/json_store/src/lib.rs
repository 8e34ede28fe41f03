//! Store implementations for structprefs.
//!
//! - [`InMemoryStore`]: values and defaults in memory, nothing persisted
//! - [`JsonFileStore`]: values persisted to a single JSON file
//! - [`MemoryStoreFactory`] and [`DirectoryStoreFactory`]: named-store
//!   factories for a `StoreRegistry`

pub mod error;
pub mod factory;
pub mod in_memory;
pub mod local_disk;
mod persisted;

pub use error::JsonStoreError;
pub use factory::{DirectoryStoreFactory, MemoryStoreFactory};
pub use in_memory::InMemoryStore;
pub use local_disk::JsonFileStore;
