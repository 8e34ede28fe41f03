//! Core traits for the LL layer.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use url::Url;

use crate::{LLError, StoredValue};

/// Read values from flat string keys.
///
/// This is the lowest-level read interface. Keys are opaque strings; the
/// store knows nothing about namespaces.
///
/// Stores are shared resources. Every method takes `&self` and
/// implementations synchronize internally.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Arc<dyn LLReader>`.
pub trait LLReader: Send + Sync {
    /// Read the value for a key.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The explicitly written value, or the registered
    ///   default when nothing was written.
    /// * `Ok(None)` - Neither a value nor a default exists (not an error condition).
    /// * `Err(LLError)` - A storage or system error occurred.
    fn ll_get(&self, key: &str) -> Result<Option<StoredValue>, LLError>;

    /// List every key that currently holds a value or a registered default.
    ///
    /// Each key appears once. Order is whatever the store finds natural and
    /// must not be relied upon.
    fn ll_keys(&self) -> Result<Vec<String>, LLError>;

    // === Native accessors ===

    /// Read a boolean. Numeric values coerce; other kinds read as `None`.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, LLError> {
        Ok(self.ll_get(key)?.and_then(|v| v.as_bool()))
    }

    /// Read an integer. Numeric values coerce; other kinds read as `None`.
    fn get_integer(&self, key: &str) -> Result<Option<i64>, LLError> {
        Ok(self.ll_get(key)?.and_then(|v| v.as_integer()))
    }

    /// Read a float. Numeric values coerce; other kinds read as `None`.
    fn get_float(&self, key: &str) -> Result<Option<f64>, LLError> {
        Ok(self.ll_get(key)?.and_then(|v| v.as_float()))
    }

    fn get_string(&self, key: &str) -> Result<Option<String>, LLError> {
        Ok(self.ll_get(key)?.and_then(|v| match v {
            StoredValue::String(s) => Some(s),
            _ => None,
        }))
    }

    fn get_blob(&self, key: &str) -> Result<Option<Bytes>, LLError> {
        Ok(self.ll_get(key)?.and_then(|v| match v {
            StoredValue::Blob(b) => Some(b),
            _ => None,
        }))
    }

    fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, LLError> {
        Ok(self.ll_get(key)?.and_then(|v| v.as_timestamp()))
    }

    fn get_locator(&self, key: &str) -> Result<Option<Url>, LLError> {
        Ok(self.ll_get(key)?.and_then(|v| match v {
            StoredValue::Locator(u) => Some(u),
            _ => None,
        }))
    }
}

/// Write values to flat string keys.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Arc<dyn LLWriter>`.
pub trait LLWriter: Send + Sync {
    /// Write a value, replacing any previous value for the key.
    fn ll_set(&self, key: &str, value: StoredValue) -> Result<(), LLError>;

    /// Remove the explicitly written value for a key.
    ///
    /// Returns whether an explicit value existed. Removing an absent key is
    /// not an error. A registered default for the key is untouched and
    /// becomes visible to readers again.
    fn ll_remove(&self, key: &str) -> Result<bool, LLError>;

    /// Register a default for a key.
    ///
    /// Defaults are only reported by reads while no explicit value exists.
    fn ll_register_default(&self, key: &str, value: StoredValue) -> Result<(), LLError>;

    /// Drop a previously registered default. Absent defaults are ignored.
    fn ll_unregister_default(&self, key: &str) -> Result<(), LLError>;
}

/// Combined read/write at the LL level.
///
/// This is a convenience trait for stores that support both reading and writing.
/// It is automatically implemented for any type that implements both `LLReader`
/// and `LLWriter`.
pub trait LLStore: LLReader + LLWriter {}
impl<T: LLReader + LLWriter> LLStore for T {}

// Blanket implementations for references and smart pointers

impl<T: LLReader + ?Sized> LLReader for &T {
    fn ll_get(&self, key: &str) -> Result<Option<StoredValue>, LLError> {
        (**self).ll_get(key)
    }

    fn ll_keys(&self) -> Result<Vec<String>, LLError> {
        (**self).ll_keys()
    }
}

impl<T: LLWriter + ?Sized> LLWriter for &T {
    fn ll_set(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        (**self).ll_set(key, value)
    }

    fn ll_remove(&self, key: &str) -> Result<bool, LLError> {
        (**self).ll_remove(key)
    }

    fn ll_register_default(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        (**self).ll_register_default(key, value)
    }

    fn ll_unregister_default(&self, key: &str) -> Result<(), LLError> {
        (**self).ll_unregister_default(key)
    }
}

impl<T: LLReader + ?Sized> LLReader for Box<T> {
    fn ll_get(&self, key: &str) -> Result<Option<StoredValue>, LLError> {
        self.as_ref().ll_get(key)
    }

    fn ll_keys(&self) -> Result<Vec<String>, LLError> {
        self.as_ref().ll_keys()
    }
}

impl<T: LLWriter + ?Sized> LLWriter for Box<T> {
    fn ll_set(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        self.as_ref().ll_set(key, value)
    }

    fn ll_remove(&self, key: &str) -> Result<bool, LLError> {
        self.as_ref().ll_remove(key)
    }

    fn ll_register_default(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        self.as_ref().ll_register_default(key, value)
    }

    fn ll_unregister_default(&self, key: &str) -> Result<(), LLError> {
        self.as_ref().ll_unregister_default(key)
    }
}

impl<T: LLReader + ?Sized> LLReader for Arc<T> {
    fn ll_get(&self, key: &str) -> Result<Option<StoredValue>, LLError> {
        self.as_ref().ll_get(key)
    }

    fn ll_keys(&self) -> Result<Vec<String>, LLError> {
        self.as_ref().ll_keys()
    }
}

impl<T: LLWriter + ?Sized> LLWriter for Arc<T> {
    fn ll_set(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        self.as_ref().ll_set(key, value)
    }

    fn ll_remove(&self, key: &str) -> Result<bool, LLError> {
        self.as_ref().ll_remove(key)
    }

    fn ll_register_default(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        self.as_ref().ll_register_default(key, value)
    }

    fn ll_unregister_default(&self, key: &str) -> Result<(), LLError> {
        self.as_ref().ll_unregister_default(key)
    }
}
