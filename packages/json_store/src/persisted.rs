//! The on-disk form of stored values.
//!
//! Each value is written as `{"type": <kind>, "value": <payload>}` so the
//! kind survives a round trip through JSON. Blobs are base64; timestamps
//! are RFC 3339.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use structprefs_core_store::{Bytes, StoredValue};
use url::Url;

use crate::JsonStoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub(crate) enum PersistedValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Blob(String),
    Timestamp(DateTime<Utc>),
    Locator(Url),
}

impl PersistedValue {
    pub(crate) fn from_stored(key: &str, value: &StoredValue) -> Result<Self, JsonStoreError> {
        Ok(match value {
            StoredValue::Bool(b) => PersistedValue::Bool(*b),
            StoredValue::Integer(i) => PersistedValue::Integer(*i),
            StoredValue::Float(f) if f.is_finite() => PersistedValue::Float(*f),
            StoredValue::Float(_) => {
                return Err(JsonStoreError::NonFiniteFloat {
                    key: key.to_string(),
                })
            }
            StoredValue::String(s) => PersistedValue::String(s.clone()),
            StoredValue::Blob(b) => PersistedValue::Blob(STANDARD.encode(b)),
            StoredValue::Timestamp(t) => PersistedValue::Timestamp(*t),
            StoredValue::Locator(u) => PersistedValue::Locator(u.clone()),
        })
    }

    pub(crate) fn into_stored(self) -> Result<StoredValue, String> {
        Ok(match self {
            PersistedValue::Bool(b) => StoredValue::Bool(b),
            PersistedValue::Integer(i) => StoredValue::Integer(i),
            PersistedValue::Float(f) => StoredValue::Float(f),
            PersistedValue::String(s) => StoredValue::String(s),
            PersistedValue::Blob(encoded) => {
                let bytes = STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| format!("invalid base64 blob: {}", e))?;
                StoredValue::Blob(Bytes::from(bytes))
            }
            PersistedValue::Timestamp(t) => StoredValue::Timestamp(t),
            PersistedValue::Locator(u) => StoredValue::Locator(u),
        })
    }
}

/// Parse a whole store file.
pub(crate) fn parse_file(contents: &[u8]) -> Result<BTreeMap<String, StoredValue>, String> {
    let entries: BTreeMap<String, PersistedValue> =
        serde_json::from_slice(contents).map_err(|e| e.to_string())?;

    let mut values = BTreeMap::new();
    for (key, persisted) in entries {
        let value = persisted
            .into_stored()
            .map_err(|message| format!("{}: {}", key, message))?;
        values.insert(key, value);
    }
    Ok(values)
}

/// Render a whole store file.
pub(crate) fn render_file(values: &BTreeMap<String, StoredValue>) -> Result<Vec<u8>, JsonStoreError> {
    let mut entries = BTreeMap::new();
    for (key, value) in values {
        entries.insert(key.as_str(), PersistedValue::from_stored(key, value)?);
    }
    Ok(serde_json::to_vec_pretty(&entries)?)
}
