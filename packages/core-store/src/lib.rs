//! Core structprefs: Namespacing Layer
//!
//! This layer gives meaning to the flat keys of the LL store:
//! - `KeyGroup` / `Key`: a closed, compile-time set of logical keys
//! - `resolve_prefix`: where a group's keys live in the flat key space
//! - `StoreRegistry`: which physical store backs a group
//! - `Namespaced`: a handle scoped to one group's namespace, with bulk
//!   enumerate / delete / register-defaults operations
//!
//! Typed reads and writes live one layer up, in `structprefs-serde-store`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use structprefs_core_store::{key_group, HostNamespace, Preferences, RejectNamed, StoreRegistry};
//! # use structprefs_core_store::{LLError, LLReader, LLWriter, StoredValue};
//! # struct Empty;
//! # impl LLReader for Empty {
//! #     fn ll_get(&self, _: &str) -> Result<Option<StoredValue>, LLError> { Ok(None) }
//! #     fn ll_keys(&self) -> Result<Vec<String>, LLError> { Ok(Vec::new()) }
//! # }
//! # impl LLWriter for Empty {
//! #     fn ll_set(&self, _: &str, _: StoredValue) -> Result<(), LLError> { Ok(()) }
//! #     fn ll_remove(&self, _: &str) -> Result<bool, LLError> { Ok(false) }
//! #     fn ll_register_default(&self, _: &str, _: StoredValue) -> Result<(), LLError> { Ok(()) }
//! #     fn ll_unregister_default(&self, _: &str) -> Result<(), LLError> { Ok(()) }
//! # }
//!
//! key_group! {
//!     pub struct Settings {
//!         theme: String,
//!         volume: i64,
//!     }
//! }
//!
//! let prefs = Preferences::new(
//!     StoreRegistry::new(Arc::new(Empty), RejectNamed),
//!     HostNamespace::new("com.acme.app"),
//! );
//! let settings = prefs.group::<Settings>().unwrap();
//! assert_eq!(settings.physical_key(Settings::theme()), "com.acme.app.defaults.theme");
//! ```

mod config;
mod error;
mod key;
mod namespace;
mod namespaced;
mod preferences;
pub mod store_registry;

pub use config::PreferencesConfig;
pub use error::Error;
pub use key::{map_key, physical_key, Key, KeyGroup};
pub use namespace::{
    resolve_prefix, HostNamespace, NamespaceConfig, DEFAULTS_SEGMENT, FALLBACK_PREFIX, SEPARATOR,
};
pub use namespaced::{Defaults, Entries, Namespaced};
pub use preferences::Preferences;
pub use store_registry::{RejectNamed, StoreFactory, StoreHandle, StoreRegistry};

// Re-export LL types for convenience
pub use structprefs_ll_store::{Bytes, LLError, LLReader, LLStore, LLWriter, StoredKind, StoredValue};
