//! Error types for the Core layer.

use structprefs_ll_store::LLError;

/// Errors at the Core layer.
///
/// These include semantic errors (misconfigured groups, codec failures) in
/// addition to the storage errors from the LL layer. A key with no value is
/// never an error.
#[derive(Debug)]
pub enum Error {
    /// A key group names a store that cannot be opened.
    ///
    /// This is fatal for the group: there is no fallback store.
    Configuration { store: String, message: String },

    /// A key group declaration is unusable (duplicate or empty key names).
    InvalidGroup { group: &'static str, message: String },

    /// A value could not be serialized.
    Encode {
        type_name: &'static str,
        message: String,
    },

    /// A stored value could not be deserialized.
    Decode {
        type_name: &'static str,
        message: String,
    },

    /// Error from the LL layer.
    Ll(LLError),

    /// Generic error with message.
    Other { message: String },
}

impl Error {
    pub fn configuration(store: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Configuration {
            store: store.into(),
            message: message.into(),
        }
    }

    pub fn encode(type_name: &'static str, message: impl Into<String>) -> Self {
        Error::Encode {
            type_name,
            message: message.into(),
        }
    }

    pub fn decode(type_name: &'static str, message: impl Into<String>) -> Self {
        Error::Decode {
            type_name,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Configuration { store, message } => {
                write!(f, "cannot open store '{}': {}", store, message)
            }
            Error::InvalidGroup { group, message } => {
                write!(f, "invalid key group {}: {}", group, message)
            }
            Error::Encode { type_name, message } => {
                write!(f, "encode error ({}): {}", type_name, message)
            }
            Error::Decode { type_name, message } => {
                write!(f, "decode error ({}): {}", type_name, message)
            }
            Error::Ll(e) => write!(f, "ll error: {}", e),
            Error::Other { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Ll(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LLError> for Error {
    fn from(e: LLError) -> Self {
        Error::Ll(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Ll(LLError::from(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn configuration_display() {
        let e = Error::configuration("suite", "name shadows the host namespace");
        let display = format!("{}", e);
        assert!(display.contains("suite"));
        assert!(display.contains("shadows"));
    }

    #[test]
    fn decode_error_display() {
        let e = Error::decode("Profile", "expected value at line 1 column 1");
        let display = format!("{}", e);
        assert!(display.contains("decode error"));
        assert!(display.contains("Profile"));
    }

    #[test]
    fn invalid_group_display() {
        let e = Error::InvalidGroup {
            group: "Settings",
            message: "duplicate key name 'theme'".to_string(),
        };
        assert!(format!("{}", e).contains("Settings"));
    }

    #[test]
    fn ll_error_source() {
        let e: Error = LLError::NotSupported.into();
        assert!(matches!(e, Error::Ll(_)));
        assert!(StdError::source(&e).is_some());
    }

    #[test]
    fn io_error_converts_through_ll() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Ll(LLError::Transport(_))));
    }

    #[test]
    fn other_error_source_is_none() {
        let e = Error::Other {
            message: "test".to_string(),
        };
        assert_eq!(format!("{}", e), "test");
        assert!(StdError::source(&e).is_none());
    }
}
