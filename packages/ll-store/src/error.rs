//! Error types for the LL layer.
//!
//! Errors at this level are store-focused. No semantic errors like
//! "unknown store name" or "type mismatch" - those belong in higher layers.

/// Errors at the LL (low-level) layer.
///
/// These are storage and system-level errors only. Absence of a key is never
/// an error at this layer; readers report it as `Ok(None)`.
#[derive(Debug)]
pub enum LLError {
    /// Generic I/O or transport failure.
    ///
    /// Use this for file I/O errors, IPC failures, OS preference-service errors, etc.
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// The operation is not supported by this store.
    ///
    /// For example, writing to a read-only store.
    NotSupported,

    /// A lock guarding the store contents was poisoned by a panicking writer.
    Poisoned,

    /// The persisted contents of the store could not be understood.
    Corrupt {
        /// What was wrong with the contents.
        message: String,
    },
}

impl std::fmt::Display for LLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLError::Transport(e) => write!(f, "transport error: {}", e),
            LLError::NotSupported => write!(f, "operation not supported"),
            LLError::Poisoned => write!(f, "store lock poisoned"),
            LLError::Corrupt { message } => write!(f, "corrupt store contents: {}", message),
        }
    }
}

impl std::error::Error for LLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LLError::Transport(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LLError {
    fn from(e: std::io::Error) -> Self {
        LLError::Transport(Box::new(e))
    }
}
