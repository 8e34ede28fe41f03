//! The StoredValue type - one native primitive held by a flat store.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use url::Url;

/// A value as the underlying store holds it.
///
/// These are the primitive kinds a preference store persists natively.
/// Anything richer is serialized into a `Blob` by a higher layer.
#[derive(Clone, Debug, PartialEq)]
pub enum StoredValue {
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 text.
    String(String),
    /// Opaque bytes. Structured values are stored this way.
    Blob(Bytes),
    /// A point in time.
    Timestamp(DateTime<Utc>),
    /// A resource locator.
    Locator(Url),
}

/// The kind of a `StoredValue`, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoredKind {
    Bool,
    Integer,
    Float,
    String,
    Blob,
    Timestamp,
    Locator,
}

impl StoredKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoredKind::Bool => "bool",
            StoredKind::Integer => "integer",
            StoredKind::Float => "float",
            StoredKind::String => "string",
            StoredKind::Blob => "blob",
            StoredKind::Timestamp => "timestamp",
            StoredKind::Locator => "locator",
        }
    }
}

impl fmt::Display for StoredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StoredValue {
    /// Get the kind of this value.
    pub fn kind(&self) -> StoredKind {
        match self {
            StoredValue::Bool(_) => StoredKind::Bool,
            StoredValue::Integer(_) => StoredKind::Integer,
            StoredValue::Float(_) => StoredKind::Float,
            StoredValue::String(_) => StoredKind::String,
            StoredValue::Blob(_) => StoredKind::Blob,
            StoredValue::Timestamp(_) => StoredKind::Timestamp,
            StoredValue::Locator(_) => StoredKind::Locator,
        }
    }

    // === Native accessors ===
    //
    // The numeric kinds coerce into each other the way preference stores
    // traditionally do. Every other mismatch is reported as `None`.

    /// Read as a boolean. Numbers are `true` when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoredValue::Bool(b) => Some(*b),
            StoredValue::Integer(i) => Some(*i != 0),
            StoredValue::Float(f) => Some(*f != 0.0),
            _ => None,
        }
    }

    /// Read as an integer. Floats are truncated toward zero.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            StoredValue::Bool(b) => Some(i64::from(*b)),
            StoredValue::Integer(i) => Some(*i),
            StoredValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            _ => None,
        }
    }

    /// Read as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            StoredValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            StoredValue::Integer(i) => Some(*i as f64),
            StoredValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            StoredValue::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_locator(&self) -> Option<&Url> {
        match self {
            StoredValue::Locator(u) => Some(u),
            _ => None,
        }
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Bool(b) => write!(f, "{}", b),
            StoredValue::Integer(i) => write!(f, "{}", i),
            StoredValue::Float(x) => write!(f, "{}", x),
            StoredValue::String(s) => write!(f, "{:?}", s),
            StoredValue::Blob(b) => match std::str::from_utf8(b) {
                // Structured blobs are JSON text, so show them as such
                Ok(text) => write!(f, "<{} bytes> {}", b.len(), text),
                Err(_) => write!(f, "<{} bytes>", b.len()),
            },
            StoredValue::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            StoredValue::Locator(u) => write!(f, "{}", u),
        }
    }
}

// Conversion from common types

impl From<bool> for StoredValue {
    fn from(v: bool) -> Self {
        StoredValue::Bool(v)
    }
}

impl From<i64> for StoredValue {
    fn from(v: i64) -> Self {
        StoredValue::Integer(v)
    }
}

impl From<i32> for StoredValue {
    fn from(v: i32) -> Self {
        StoredValue::Integer(v as i64)
    }
}

impl From<f64> for StoredValue {
    fn from(v: f64) -> Self {
        StoredValue::Float(v)
    }
}

impl From<String> for StoredValue {
    fn from(v: String) -> Self {
        StoredValue::String(v)
    }
}

impl From<&str> for StoredValue {
    fn from(v: &str) -> Self {
        StoredValue::String(v.to_string())
    }
}

impl From<Bytes> for StoredValue {
    fn from(v: Bytes) -> Self {
        StoredValue::Blob(v)
    }
}

impl From<DateTime<Utc>> for StoredValue {
    fn from(v: DateTime<Utc>) -> Self {
        StoredValue::Timestamp(v)
    }
}

impl From<Url> for StoredValue {
    fn from(v: Url) -> Self {
        StoredValue::Locator(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_kinds_coerce() {
        assert_eq!(StoredValue::Integer(3).as_bool(), Some(true));
        assert_eq!(StoredValue::Integer(0).as_bool(), Some(false));
        assert_eq!(StoredValue::Float(2.9).as_integer(), Some(2));
        assert_eq!(StoredValue::Bool(true).as_float(), Some(1.0));
        assert_eq!(StoredValue::Float(f64::NAN).as_integer(), None);
    }

    #[test]
    fn other_mismatches_are_none() {
        let text = StoredValue::from("1");
        assert_eq!(text.as_bool(), None);
        assert_eq!(text.as_integer(), None);
        assert_eq!(StoredValue::Integer(1).as_str(), None);
        assert!(StoredValue::from("x").as_blob().is_none());
        assert!(StoredValue::Bool(true).as_locator().is_none());
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(StoredValue::from(1.5).kind(), StoredKind::Float);
        assert_eq!(
            StoredValue::from(Bytes::from_static(b"x")).kind(),
            StoredKind::Blob
        );
        assert_eq!(StoredKind::Timestamp.to_string(), "timestamp");
    }

    #[test]
    fn display_shows_json_blobs() {
        let v = StoredValue::Blob(Bytes::from_static(b"{\"a\":1}"));
        assert_eq!(v.to_string(), "<7 bytes> {\"a\":1}");

        let v = StoredValue::Blob(Bytes::from_static(&[0xff, 0xfe]));
        assert_eq!(v.to_string(), "<2 bytes>");

        assert_eq!(StoredValue::from("dark").to_string(), "\"dark\"");
    }
}
