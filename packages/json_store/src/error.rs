use std::io;
use std::path::PathBuf;

use structprefs_core_store::LLError;

#[derive(thiserror::Error, Debug)]
pub enum JsonStoreError {
    #[error("The store root {path} is not usable: {error}")]
    RootPathInvalid { path: PathBuf, error: io::Error },
    #[error("Invalid store name {name:?}: {message}")]
    InvalidStoreName { name: String, message: String },
    #[error("I/O error on {path}: {error}")]
    Io { path: PathBuf, error: io::Error },
    #[error("The store file {path} is malformed: {message}")]
    Malformed { path: PathBuf, message: String },
    #[error("Key {key:?} holds a non-finite float, which JSON cannot represent")]
    NonFiniteFloat { key: String },
    #[error("{0}")]
    SerializationError(#[from] serde_json::error::Error),
    #[error("A store lock was poisoned")]
    Poisoned,
}

impl From<JsonStoreError> for LLError {
    fn from(error: JsonStoreError) -> Self {
        match error {
            JsonStoreError::Malformed { .. } => LLError::Corrupt {
                message: format!("{}", error),
            },
            JsonStoreError::Poisoned => LLError::Poisoned,
            JsonStoreError::NonFiniteFloat { .. } => LLError::NotSupported,
            other => LLError::Transport(Box::new(other)),
        }
    }
}
