//! Serde Integration for structprefs
//!
//! This layer provides typed access to key-group handles. It adds:
//! - `Preference`: how a Rust type maps onto the store's native kinds
//! - `TypedPreferences`: `get` / `set` / `encode` / `decode` on a `Namespaced` handle
//! - `TypedDefaults`: typed default registration
//! - `JsonCodec`: the structured-serialization path
//!
//! # Example
//!
//! ```rust,ignore
//! use structprefs_serde_store::{key_group, TypedPreferences};
//!
//! key_group! {
//!     pub struct Settings {
//!         theme: String,
//!         volume: i64,
//!     }
//! }
//!
//! fn bump(prefs: &Preferences) -> Result<(), Error> {
//!     let settings = prefs.group::<Settings>()?;
//!     let volume = settings.get(Settings::volume());
//!     settings.set(Settings::volume(), volume + 1)
//! }
//! ```

mod codec;
mod preference;
mod typed;

pub use codec::JsonCodec;
pub use preference::{decode_structured, encode_structured, Preference, Structured};
pub use typed::{TypedDefaults, TypedPreferences};

// Re-export core types for convenience
pub use structprefs_core_store::{
    key_group, Bytes, Defaults, Error, Key, KeyGroup, Namespaced, Preferences, StoredKind,
    StoredValue,
};
