//! structprefs: typed, namespaced preferences over a flat key-value store.
//!
//! Keys are declared in groups with [`key_group!`]. Each group resolves to
//! a key prefix (an explicit one, or one derived from the host
//! application's namespace) and to a backing store (the default one, or a
//! named one). Values are read and written through typed keys; types the
//! store has no native kind for go through a JSON codec.
//!
//! # Example
//!
//! ```rust
//! use structprefs::{key_group, HostNamespace, TypedPreferences};
//!
//! key_group! {
//!     pub struct Settings {
//!         theme: String,
//!         volume: i64,
//!     }
//! }
//!
//! let prefs = structprefs::in_memory(HostNamespace::new("com.acme.app"));
//! let settings = prefs.group::<Settings>().unwrap();
//!
//! settings.set(Settings::theme(), "dark".to_string()).unwrap();
//! assert_eq!(settings.get(Settings::theme()), "dark");
//! assert_eq!(settings.get(Settings::volume()), 0);
//! assert_eq!(
//!     settings.physical_key(Settings::theme()),
//!     "com.acme.app.defaults.theme"
//! );
//! ```

use std::sync::Arc;

pub use structprefs_core_store::{
    key_group, map_key, physical_key, resolve_prefix, Bytes, Defaults, Entries, Error,
    HostNamespace, Key, KeyGroup, LLError, LLReader, LLStore, LLWriter, Namespaced,
    NamespaceConfig, Preferences, PreferencesConfig, RejectNamed, StoreFactory, StoreHandle,
    StoreRegistry, StoredKind, StoredValue, DEFAULTS_SEGMENT, FALLBACK_PREFIX, SEPARATOR,
};
pub use structprefs_json_store::{
    DirectoryStoreFactory, InMemoryStore, JsonFileStore, JsonStoreError, MemoryStoreFactory,
};
pub use structprefs_serde_store::{
    decode_structured, encode_structured, impl_structured_preference, JsonCodec, Preference,
    Structured, TypedDefaults, TypedPreferences,
};

/// Open file-backed preferences.
///
/// The default store is `<directory>/defaults.json`; named stores are
/// `<directory>/<name>.json`, opened on first use.
///
/// # Errors
///
/// * `Error::Other` - no directory is configured and the platform has no
///   config directory.
/// * `Error::Ll` - the default store file exists but cannot be read or parsed.
pub fn open(config: &PreferencesConfig) -> Result<Preferences, Error> {
    let directory = config.resolved_directory().ok_or_else(|| Error::Other {
        message: "no preferences directory configured and no platform config directory"
            .to_string(),
    })?;

    let factory = DirectoryStoreFactory::new(directory);
    let default_store = factory
        .open_default()
        .map_err(|e| Error::Ll(LLError::from(e)))?;
    log::debug!(
        "Opened preferences at {} for {}",
        factory.root().display(),
        config.host()
    );

    Ok(Preferences::new(
        StoreRegistry::new(Arc::new(default_store), factory),
        config.host(),
    ))
}

/// In-memory preferences. Named stores are fresh in-memory stores.
pub fn in_memory(host: HostNamespace) -> Preferences {
    Preferences::new(
        StoreRegistry::new(Arc::new(InMemoryStore::new()), MemoryStoreFactory),
        host,
    )
}
