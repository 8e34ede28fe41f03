//! LL structprefs: the flat key-value store contract.
//!
//! This is the narrow waist of the structprefs stack. Everything at this level
//! is a flat string key mapped to one native primitive - no namespacing, no
//! typed keys, no structured serialization.
//!
//! Use this layer for:
//! - Implementing a new backing store (OS preference domain, file, database)
//! - Inspecting raw store contents without going through a key group
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//! use structprefs_ll_store::{LLError, LLReader, StoredValue};
//!
//! struct FixedStore {
//!     data: Mutex<HashMap<String, StoredValue>>,
//! }
//!
//! impl LLReader for FixedStore {
//!     fn ll_get(&self, key: &str) -> Result<Option<StoredValue>, LLError> {
//!         let data = self.data.lock().map_err(|_| LLError::Poisoned)?;
//!         Ok(data.get(key).cloned())
//!     }
//!
//!     fn ll_keys(&self) -> Result<Vec<String>, LLError> {
//!         let data = self.data.lock().map_err(|_| LLError::Poisoned)?;
//!         Ok(data.keys().cloned().collect())
//!     }
//! }
//! ```

pub use bytes::Bytes;

mod error;
mod traits;
mod value;

pub use error::LLError;
pub use traits::{LLReader, LLStore, LLWriter};
pub use value::{StoredKind, StoredValue};
