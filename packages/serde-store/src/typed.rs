//! Typed access extension traits.

use serde::de::DeserializeOwned;
use serde::Serialize;

use structprefs_core_store::{Defaults, Error, Key, KeyGroup, Namespaced, StoredValue};

use crate::{JsonCodec, Preference};

/// Extension trait for typed reads and writes on a group handle.
///
/// # Example
///
/// ```rust,ignore
/// use structprefs_serde_store::TypedPreferences;
///
/// fn toggle_mute(settings: &Namespaced<Settings>) -> Result<(), Error> {
///     let muted = settings.get(Settings::muted());
///     settings.set(Settings::muted(), !muted)
/// }
/// ```
pub trait TypedPreferences<G: KeyGroup> {
    /// Read a value, falling back to `T::default()`.
    ///
    /// Never fails; see [`get_or`](Self::get_or).
    fn get<T: Preference + Default>(&self, key: Key<G, T>) -> T {
        self.get_or(key, T::default())
    }

    /// Read a value, falling back to `default`.
    ///
    /// Never fails. When nothing usable is stored the result is
    /// `T::missing(default)`: the default itself, or zero for the numeric
    /// kinds and `bool`. A stored structured value that no longer
    /// deserializes is logged and replaced by `default`.
    fn get_or<T: Preference>(&self, key: Key<G, T>, default: T) -> T;

    /// Write a value. A value that encodes as "no value" removes the key.
    fn set<T: Preference>(&self, key: Key<G, T>, value: T) -> Result<(), Error>;

    /// Write a value through the structured path, whatever its type.
    ///
    /// Unlike `set`, this bypasses native kinds and always stores a blob.
    fn encode<T: Serialize>(&self, value: &T, key: Key<G, T>) -> Result<(), Error>;

    /// Read a value through the structured path.
    ///
    /// `Ok(None)` when nothing is stored; `Err(Error::Decode)` when the
    /// stored value is not a blob of `T`.
    fn decode<T: DeserializeOwned>(&self, key: Key<G, T>) -> Result<Option<T>, Error>;
}

impl<G: KeyGroup> TypedPreferences<G> for Namespaced<G> {
    fn get_or<T: Preference>(&self, key: Key<G, T>, default: T) -> T {
        let stored = match self.read_stored(key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return T::missing(default),
            Err(e) => {
                log::warn!(
                    "Cannot read {}, using default: {}",
                    self.physical_key(key),
                    e
                );
                return T::missing(default);
            }
        };

        match T::from_stored(stored) {
            Ok(Some(value)) => value,
            Ok(None) => T::missing(default),
            Err(e) => {
                log::warn!(
                    "Discarding undecodable value at {}: {}",
                    self.physical_key(key),
                    e
                );
                default
            }
        }
    }

    fn set<T: Preference>(&self, key: Key<G, T>, value: T) -> Result<(), Error> {
        match value.to_stored()? {
            Some(stored) => self.write_stored(key, stored),
            None => self.remove(key),
        }
    }

    fn encode<T: Serialize>(&self, value: &T, key: Key<G, T>) -> Result<(), Error> {
        let stored = JsonCodec.encode_stored(value)?;
        self.write_stored(key, stored)
    }

    fn decode<T: DeserializeOwned>(&self, key: Key<G, T>) -> Result<Option<T>, Error> {
        match self.read_stored(key)? {
            Some(stored) => JsonCodec.decode_stored(&stored).map(Some),
            None => Ok(None),
        }
    }
}

/// Extension trait for typed default registration.
pub trait TypedDefaults<G: KeyGroup>: Sized {
    /// Add a default. A value that encodes as "no value" registers nothing.
    fn insert<T: Preference>(&mut self, key: Key<G, T>, value: T) -> Result<(), Error>;

    /// Builder form of `insert`.
    fn with<T: Preference>(mut self, key: Key<G, T>, value: T) -> Result<Self, Error> {
        self.insert(key, value)?;
        Ok(self)
    }
}

impl<G: KeyGroup> TypedDefaults<G> for Defaults<G> {
    fn insert<T: Preference>(&mut self, key: Key<G, T>, value: T) -> Result<(), Error> {
        let stored: Option<StoredValue> = value.to_stored()?;
        if let Some(stored) = stored {
            self.insert_stored(key, stored);
        }
        Ok(())
    }
}
