//! JSON codec for structured values.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use structprefs_core_store::{Error, StoredValue};

/// The structured-serialization codec.
///
/// Values the store has no native kind for are encoded as JSON and kept in
/// a `StoredValue::Blob`.
///
/// # Example
///
/// ```rust
/// use structprefs_serde_store::JsonCodec;
///
/// let codec = JsonCodec;
/// let bytes = codec.to_bytes(&vec![1, 2, 3]).unwrap();
/// assert_eq!(&bytes[..], b"[1,2,3]");
///
/// let decoded: Vec<i32> = codec.from_bytes(&bytes).unwrap();
/// assert_eq!(decoded, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn to_bytes<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, Error> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| Error::encode(std::any::type_name::<T>(), e.to_string()))?;
        Ok(Bytes::from(bytes))
    }

    pub fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Error> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::decode(std::any::type_name::<T>(), e.to_string()))
    }

    /// Encode into a blob ready for the store.
    pub fn encode_stored<T: Serialize + ?Sized>(&self, value: &T) -> Result<StoredValue, Error> {
        Ok(StoredValue::Blob(self.to_bytes(value)?))
    }

    /// Decode a stored blob. Any other kind is a decode error.
    pub fn decode_stored<T: DeserializeOwned>(&self, stored: &StoredValue) -> Result<T, Error> {
        match stored {
            StoredValue::Blob(bytes) => self.from_bytes(bytes),
            other => Err(Error::decode(
                std::any::type_name::<T>(),
                format!("expected blob, found {}", other.kind()),
            )),
        }
    }
}
