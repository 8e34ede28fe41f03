//! How Rust types map onto stored values.
//!
//! Dispatch is static: each type picks its representation through its
//! `Preference` impl. Types with a native store kind pass straight through;
//! everything else goes through [`JsonCodec`] into a blob.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use structprefs_core_store::{Error, StoredValue};
use url::Url;

use crate::JsonCodec;

/// A type that can be kept under a typed key.
///
/// # Implementing for your own types
///
/// Serde types opt into the structured path with
/// [`impl_structured_preference!`](crate::impl_structured_preference), or by
/// wrapping in [`Structured`].
pub trait Preference: Sized {
    /// Encode for the store.
    ///
    /// `Ok(None)` means "no value": writing it removes the key instead.
    fn to_stored(&self) -> Result<Option<StoredValue>, Error>;

    /// Decode a stored value.
    ///
    /// A stored kind the type has no reading for is `Ok(None)`, the same as
    /// an absent key. Structured data that fails to deserialize is `Err`.
    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error>;

    /// The value reported when nothing usable is stored.
    ///
    /// The caller's default, except for the numeric kinds and `bool`, which
    /// report their zero value like the store's native accessors do.
    fn missing(default: Self) -> Self {
        default
    }
}

/// Encode any serde type as a structured blob.
pub fn encode_structured<T: Serialize + ?Sized>(value: &T) -> Result<StoredValue, Error> {
    JsonCodec.encode_stored(value)
}

/// Decode a structured blob. Non-blob kinds are decode errors.
pub fn decode_structured<T: DeserializeOwned>(stored: StoredValue) -> Result<Option<T>, Error> {
    JsonCodec.decode_stored(&stored).map(Some)
}

// === Native kinds ===

impl Preference for bool {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        Ok(Some(StoredValue::Bool(*self)))
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        Ok(stored.as_bool())
    }

    fn missing(_default: Self) -> Self {
        false
    }
}

macro_rules! integer_preference {
    ($($t:ty),*) => {
        $(
            impl Preference for $t {
                fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
                    let value = i64::try_from(*self).map_err(|e| {
                        Error::encode(stringify!($t), format!("{} does not fit in i64: {}", self, e))
                    })?;
                    Ok(Some(StoredValue::Integer(value)))
                }

                fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
                    // Out-of-range integers read as absent, like any other mismatch
                    Ok(stored.as_integer().and_then(|i| <$t>::try_from(i).ok()))
                }

                fn missing(_default: Self) -> Self {
                    0
                }
            }
        )*
    };
}

integer_preference!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Preference for f64 {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        Ok(Some(StoredValue::Float(*self)))
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        Ok(stored.as_float())
    }

    fn missing(_default: Self) -> Self {
        0.0
    }
}

impl Preference for f32 {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        Ok(Some(StoredValue::Float(f64::from(*self))))
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        Ok(stored.as_float().map(|f| f as f32))
    }

    fn missing(_default: Self) -> Self {
        0.0
    }
}

impl Preference for String {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        Ok(Some(StoredValue::String(self.clone())))
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        Ok(match stored {
            StoredValue::String(s) => Some(s),
            _ => None,
        })
    }
}

impl Preference for Bytes {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        Ok(Some(StoredValue::Blob(self.clone())))
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        Ok(match stored {
            StoredValue::Blob(b) => Some(b),
            _ => None,
        })
    }
}

impl Preference for DateTime<Utc> {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        Ok(Some(StoredValue::Timestamp(*self)))
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        Ok(stored.as_timestamp())
    }
}

impl Preference for Url {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        Ok(Some(StoredValue::Locator(self.clone())))
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        Ok(match stored {
            StoredValue::Locator(u) => Some(u),
            _ => None,
        })
    }
}

// === Optional values ===

impl<T: Preference> Preference for Option<T> {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        match self {
            None => Ok(None),
            Some(value) => value.to_stored(),
        }
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        Ok(T::from_stored(stored)?.map(Some))
    }

    // Absent optionals are the caller's default (normally `None`), even for
    // the numeric kinds.
    fn missing(default: Self) -> Self {
        default
    }
}

// === Structured values ===

/// Wrapper that sends any serde type through the structured path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Structured<T>(pub T);

impl<T: Serialize + DeserializeOwned> Preference for Structured<T> {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        encode_structured(&self.0).map(Some)
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        Ok(decode_structured(stored)?.map(Structured))
    }
}

/// Implement [`Preference`] for serde types via the structured path.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use structprefs_serde_store::{impl_structured_preference, Preference, StoredValue};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Profile {
///     name: String,
///     age: u32,
/// }
///
/// impl_structured_preference!(Profile);
///
/// let stored = Profile { name: "John".into(), age: 30 }.to_stored().unwrap().unwrap();
/// assert!(matches!(stored, StoredValue::Blob(_)));
/// ```
#[macro_export]
macro_rules! impl_structured_preference {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Preference for $ty {
                fn to_stored(
                    &self,
                ) -> ::std::result::Result<::std::option::Option<$crate::StoredValue>, $crate::Error> {
                    $crate::encode_structured(self).map(::std::option::Option::Some)
                }

                fn from_stored(
                    stored: $crate::StoredValue,
                ) -> ::std::result::Result<::std::option::Option<Self>, $crate::Error> {
                    $crate::decode_structured(stored)
                }
            }
        )+
    };
}

impl<T: Serialize + DeserializeOwned> Preference for Vec<T> {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        encode_structured(self).map(Some)
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        decode_structured(stored)
    }
}

impl<T: Serialize + DeserializeOwned> Preference for BTreeMap<String, T> {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        encode_structured(self).map(Some)
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        decode_structured(stored)
    }
}

impl<T: Serialize + DeserializeOwned> Preference for HashMap<String, T> {
    fn to_stored(&self) -> Result<Option<StoredValue>, Error> {
        encode_structured(self).map(Some)
    }

    fn from_stored(stored: StoredValue) -> Result<Option<Self>, Error> {
        decode_structured(stored)
    }
}

impl_structured_preference!(serde_json::Value);
