//! A handle scoped to one key group's namespace.
//!
//! `Namespaced` knows the group's resolved prefix and backing store. It
//! offers untyped per-key access and the bulk operations over every physical
//! key under the prefix. Typed access is layered on top by
//! `structprefs-serde-store`.
//!
//! None of the bulk operations are transactional: each is a sequence of
//! independent store calls, and concurrent writers may interleave with them.

use std::io;
use std::marker::PhantomData;

use structprefs_ll_store::{LLReader, LLStore, LLWriter, StoredValue};

use crate::key::{map_key, Key, KeyGroup};
use crate::store_registry::StoreHandle;
use crate::Error;

pub struct Namespaced<G> {
    prefix: String,
    store: StoreHandle,
    _group: PhantomData<fn() -> G>,
}

impl<G> Clone for Namespaced<G> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            store: StoreHandle::clone(&self.store),
            _group: PhantomData,
        }
    }
}

impl<G: KeyGroup> std::fmt::Debug for Namespaced<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespaced")
            .field("group", &G::NAME)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl<G: KeyGroup> Namespaced<G> {
    /// Create a handle from an already resolved prefix and store.
    ///
    /// Most callers get handles from `Preferences::group` instead.
    pub fn new(prefix: String, store: StoreHandle) -> Self {
        Self {
            prefix,
            store,
            _group: PhantomData,
        }
    }

    /// The resolved prefix, ending in the separator.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The store backing this group.
    ///
    /// Exposed so observation or binding layers can attach to the same store.
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// The physical key a logical key maps to.
    pub fn physical_key<T>(&self, key: Key<G, T>) -> String {
        map_key(&self.prefix, key.name())
    }

    // === Untyped per-key access ===

    /// Read the stored value (or registered default) for a key.
    pub fn read_stored<T>(&self, key: Key<G, T>) -> Result<Option<StoredValue>, Error> {
        Ok(self.store.ll_get(&self.physical_key(key))?)
    }

    /// Write a stored value for a key.
    pub fn write_stored<T>(&self, key: Key<G, T>, value: StoredValue) -> Result<(), Error> {
        Ok(self.store.ll_set(&self.physical_key(key), value)?)
    }

    /// Remove the explicit value for a key. Absent keys are fine.
    pub fn remove<T>(&self, key: Key<G, T>) -> Result<(), Error> {
        self.store.ll_remove(&self.physical_key(key))?;
        Ok(())
    }

    /// Whether the key currently resolves to a value or a default.
    pub fn contains<T>(&self, key: Key<G, T>) -> Result<bool, Error> {
        Ok(self.read_stored(key)?.is_some())
    }

    // === Bulk operations ===

    /// Every physical key in the store that starts with this group's prefix.
    ///
    /// Re-queries the store on each call. Order is the store's.
    pub fn keys(&self) -> Result<Vec<String>, Error> {
        let prefix = self.prefix.as_str();
        Ok(self
            .store
            .ll_keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    /// Like `keys`, with the prefix stripped.
    pub fn logical_names(&self) -> Result<Vec<String>, Error> {
        Ok(self
            .keys()?
            .into_iter()
            .map(|key| key[self.prefix.len()..].to_string())
            .collect())
    }

    /// Lazily iterate `(physical key, value)` pairs in this namespace.
    ///
    /// The key list is taken when this is called; values are fetched as the
    /// iterator advances. Keys removed in between are skipped.
    pub fn enumerate(&self) -> Result<Entries<'_>, Error> {
        Ok(Entries {
            store: self.store.as_ref(),
            keys: self.keys()?.into_iter(),
        })
    }

    /// Write one `key: value` line per entry. Returns the number written.
    pub fn write_all_to<W: io::Write>(&self, out: &mut W) -> Result<usize, Error> {
        let mut written = 0;
        for entry in self.enumerate()? {
            let (key, value) = entry?;
            writeln!(out, "{}: {}", key, value)?;
            written += 1;
        }
        Ok(written)
    }

    /// Log every entry at info level. Debug builds only; never fails.
    pub fn print_all(&self) {
        if !cfg!(debug_assertions) {
            return;
        }

        let entries = match self.enumerate() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot list {} ({}): {}", G::NAME, self.prefix, e);
                return;
            }
        };

        for entry in entries {
            match entry {
                Ok((key, value)) => log::info!("{}: {}", key, value),
                Err(e) => log::warn!("Cannot read entry of {}: {}", G::NAME, e),
            }
        }
    }

    /// Remove the explicit value of every key in this namespace.
    ///
    /// Registered defaults stay registered, so keys that only have a
    /// default are still listed afterwards. Returns the number of explicit
    /// values removed. Keys written by someone else while this runs may or
    /// may not be removed.
    pub fn delete_all(&self) -> Result<usize, Error> {
        let mut removed = 0;
        for key in self.keys()? {
            if self.store.ll_remove(&key)? {
                removed += 1;
            }
        }
        log::debug!("Deleted {} values under {}", removed, self.prefix);
        Ok(removed)
    }

    /// Register store-level defaults for this group.
    ///
    /// With `reset`, every key currently in the namespace first loses both
    /// its explicit value and its registered default, so reads afterwards
    /// see exactly the new defaults.
    pub fn register_defaults(&self, defaults: Defaults<G>, reset: bool) -> Result<(), Error> {
        if reset {
            for key in self.keys()? {
                self.store.ll_remove(&key)?;
                self.store.ll_unregister_default(&key)?;
            }
        }

        for (name, value) in defaults.entries {
            self.store
                .ll_register_default(&map_key(&self.prefix, name), value)?;
        }
        Ok(())
    }
}

/// Lazy iterator over a namespace, from [`Namespaced::enumerate`].
pub struct Entries<'a> {
    store: &'a dyn LLStore,
    keys: std::vec::IntoIter<String>,
}

impl Iterator for Entries<'_> {
    type Item = Result<(String, StoredValue), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let key = self.keys.next()?;
            match self.store.ll_get(&key) {
                Ok(Some(value)) => return Some(Ok((key, value))),
                // Removed since the key list was taken
                Ok(None) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// A set of defaults for group `G`, keyed by logical key.
///
/// Later inserts for the same key replace earlier ones.
pub struct Defaults<G> {
    entries: Vec<(&'static str, StoredValue)>,
    _group: PhantomData<fn() -> G>,
}

impl<G: KeyGroup> Defaults<G> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            _group: PhantomData,
        }
    }

    /// Add an already encoded default.
    pub fn insert_stored<T>(&mut self, key: Key<G, T>, value: StoredValue) {
        let name = key.name();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of `insert_stored`.
    #[must_use]
    pub fn with_stored<T>(mut self, key: Key<G, T>, value: StoredValue) -> Self {
        self.insert_stored(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<G: KeyGroup> Default for Defaults<G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use structprefs_ll_store::{LLError, LLReader, LLWriter};

    use crate::key_group;

    key_group! {
        struct Settings {
            theme: String,
            volume: i64,
            muted: bool,
        }
    }

    key_group! {
        struct Other(prefix = "other") {
            theme: String,
        }
    }

    #[derive(Default)]
    struct MapStore {
        values: Mutex<BTreeMap<String, StoredValue>>,
        defaults: Mutex<BTreeMap<String, StoredValue>>,
    }

    impl LLReader for MapStore {
        fn ll_get(&self, key: &str) -> Result<Option<StoredValue>, LLError> {
            if let Some(v) = self.values.lock().unwrap().get(key) {
                return Ok(Some(v.clone()));
            }
            Ok(self.defaults.lock().unwrap().get(key).cloned())
        }

        fn ll_keys(&self) -> Result<Vec<String>, LLError> {
            let mut keys: Vec<String> = self.values.lock().unwrap().keys().cloned().collect();
            for key in self.defaults.lock().unwrap().keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            Ok(keys)
        }
    }

    impl LLWriter for MapStore {
        fn ll_set(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
            self.values.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        fn ll_remove(&self, key: &str) -> Result<bool, LLError> {
            Ok(self.values.lock().unwrap().remove(key).is_some())
        }

        fn ll_register_default(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
            self.defaults.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        fn ll_unregister_default(&self, key: &str) -> Result<(), LLError> {
            self.defaults.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn handles() -> (Namespaced<Settings>, Namespaced<Other>, Arc<MapStore>) {
        let store = Arc::new(MapStore::default());
        let settings = Namespaced::new("com.acme.app.defaults.".to_string(), store.clone());
        let other = Namespaced::new("other.".to_string(), store.clone());
        (settings, other, store)
    }

    #[test]
    fn per_key_access_uses_physical_key() {
        let (settings, _, store) = handles();

        settings
            .write_stored(Settings::theme(), StoredValue::from("dark"))
            .unwrap();

        assert_eq!(
            store.get_string("com.acme.app.defaults.theme").unwrap(),
            Some("dark".to_string())
        );
        assert!(settings.contains(Settings::theme()).unwrap());
        assert!(!settings.contains(Settings::volume()).unwrap());

        settings.remove(Settings::theme()).unwrap();
        assert!(!settings.contains(Settings::theme()).unwrap());
    }

    #[test]
    fn enumerate_filters_by_prefix() {
        let (settings, other, store) = handles();
        settings
            .write_stored(Settings::theme(), StoredValue::from("dark"))
            .unwrap();
        settings
            .write_stored(Settings::volume(), StoredValue::Integer(3))
            .unwrap();
        other
            .write_stored(Other::theme(), StoredValue::from("light"))
            .unwrap();
        store.ll_set("unrelated", StoredValue::Bool(true)).unwrap();

        let mut entries: Vec<(String, StoredValue)> = settings
            .enumerate()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(
            entries,
            vec![
                (
                    "com.acme.app.defaults.theme".to_string(),
                    StoredValue::from("dark")
                ),
                (
                    "com.acme.app.defaults.volume".to_string(),
                    StoredValue::Integer(3)
                ),
            ]
        );

        let mut names = settings.logical_names().unwrap();
        names.sort();
        assert_eq!(names, vec!["theme".to_string(), "volume".to_string()]);
    }

    #[test]
    fn enumerate_skips_keys_removed_mid_iteration() {
        let (settings, _, store) = handles();
        settings
            .write_stored(Settings::theme(), StoredValue::from("dark"))
            .unwrap();
        settings
            .write_stored(Settings::volume(), StoredValue::Integer(3))
            .unwrap();

        let mut entries = settings.enumerate().unwrap();
        store.ll_remove("com.acme.app.defaults.volume").unwrap();

        let first = entries.next().unwrap().unwrap();
        assert_eq!(first.0, "com.acme.app.defaults.theme");
        assert!(entries.next().is_none());
    }

    #[test]
    fn enumerate_is_restartable() {
        let (settings, _, _) = handles();
        assert_eq!(settings.enumerate().unwrap().count(), 0);

        settings
            .write_stored(Settings::muted(), StoredValue::Bool(true))
            .unwrap();
        assert_eq!(settings.enumerate().unwrap().count(), 1);
    }

    #[test]
    fn delete_all_leaves_other_groups() {
        let (settings, other, store) = handles();
        settings
            .write_stored(Settings::theme(), StoredValue::from("dark"))
            .unwrap();
        settings
            .write_stored(Settings::volume(), StoredValue::Integer(3))
            .unwrap();
        other
            .write_stored(Other::theme(), StoredValue::from("light"))
            .unwrap();

        assert_eq!(settings.delete_all().unwrap(), 2);

        assert!(settings.keys().unwrap().is_empty());
        assert_eq!(
            store.get_string("other.theme").unwrap(),
            Some("light".to_string())
        );
    }

    #[test]
    fn delete_all_counts_only_explicit_values() {
        let (settings, _, _) = handles();
        settings
            .register_defaults(
                Defaults::new()
                    .with_stored(Settings::volume(), StoredValue::Integer(5))
                    .with_stored(Settings::muted(), StoredValue::Bool(true)),
                false,
            )
            .unwrap();

        assert_eq!(settings.delete_all().unwrap(), 0);
        // Defaults survive, and are still listed
        assert_eq!(settings.keys().unwrap().len(), 2);

        settings
            .write_stored(Settings::volume(), StoredValue::Integer(9))
            .unwrap();
        assert_eq!(settings.delete_all().unwrap(), 1);
        assert_eq!(
            settings.read_stored(Settings::volume()).unwrap(),
            Some(StoredValue::Integer(5))
        );
    }

    #[test]
    fn register_defaults_without_reset_keeps_values() {
        let (settings, _, _) = handles();
        settings
            .write_stored(Settings::volume(), StoredValue::Integer(9))
            .unwrap();

        let defaults = Defaults::new()
            .with_stored(Settings::volume(), StoredValue::Integer(5))
            .with_stored(Settings::theme(), StoredValue::from("light"));
        settings.register_defaults(defaults, false).unwrap();

        assert_eq!(
            settings.read_stored(Settings::volume()).unwrap(),
            Some(StoredValue::Integer(9))
        );
        assert_eq!(
            settings.read_stored(Settings::theme()).unwrap(),
            Some(StoredValue::from("light"))
        );
    }

    #[test]
    fn register_defaults_with_reset_clears_values_and_old_defaults() {
        let (settings, other, _) = handles();
        settings
            .write_stored(Settings::volume(), StoredValue::Integer(9))
            .unwrap();
        settings
            .register_defaults(
                Defaults::new().with_stored(Settings::muted(), StoredValue::Bool(true)),
                false,
            )
            .unwrap();
        other
            .write_stored(Other::theme(), StoredValue::from("light"))
            .unwrap();

        settings
            .register_defaults(
                Defaults::new().with_stored(Settings::volume(), StoredValue::Integer(5)),
                true,
            )
            .unwrap();

        assert_eq!(
            settings.read_stored(Settings::volume()).unwrap(),
            Some(StoredValue::Integer(5))
        );
        assert_eq!(settings.read_stored(Settings::muted()).unwrap(), None);
        assert!(other.contains(Other::theme()).unwrap());

        // An explicit write still wins over the new default
        settings
            .write_stored(Settings::volume(), StoredValue::Integer(1))
            .unwrap();
        assert_eq!(
            settings.read_stored(Settings::volume()).unwrap(),
            Some(StoredValue::Integer(1))
        );
    }

    #[test]
    fn defaults_replace_duplicate_keys() {
        let defaults = Defaults::new()
            .with_stored(Settings::volume(), StoredValue::Integer(1))
            .with_stored(Settings::volume(), StoredValue::Integer(2));
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults.entries[0].1, StoredValue::Integer(2));
    }

    #[test]
    fn write_all_to_lists_entries() {
        let (settings, _, _) = handles();
        settings
            .write_stored(Settings::theme(), StoredValue::from("dark"))
            .unwrap();

        let mut out = Vec::new();
        assert_eq!(settings.write_all_to(&mut out).unwrap(), 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "com.acme.app.defaults.theme: \"dark\"\n"
        );

        // Never fails, with or without entries
        settings.print_all();
    }
}
