//! Error taxonomy shared across the StudyFrog core crates.
//!
//! Mirrors the five error kinds named in the rehearsal engine's design:
//! `not-found`, `validation`, `storage-io`, `dispatch-handler`, and
//! `programmer`. Every crate in this workspace returns [`Error`] (via
//! [`Result`]) rather than inventing its own error type, so callers can
//! match on a single enum regardless of which layer raised it.

/// Result type alias used throughout the StudyFrog core.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the StudyFrog core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced key has no row in its table. Callers log and skip;
    /// this never propagates to the user.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required form field was empty or out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// A backing file failed to read or write.
    #[error("storage I/O error: {0}")]
    StorageIo(String),

    /// A dispatcher handler raised while processing an event.
    #[error("handler error in {handler}: {message}")]
    DispatchHandler {
        /// Name of the handler that raised.
        handler: String,
        /// The error message it raised with.
        message: String,
    },

    /// An unknown tag, malformed key, or invalid enum value was
    /// encountered. Not recoverable; the current event is abandoned.
    #[error("programmer error: {0}")]
    Programmer(String),

    /// JSON (de)serialization of a table file failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The on-disk table file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is recoverable (worth retrying with backoff).
    /// Storage and handler faults are transient, everything else is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::StorageIo(_) | Error::DispatchHandler { .. } | Error::Io(_))
    }

    /// Shorthand for constructing a [`Error::NotFound`] from a key.
    pub fn not_found(key: impl Into<String>) -> Self {
        Error::NotFound(key.into())
    }

    /// Shorthand for constructing a [`Error::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Shorthand for constructing a [`Error::Programmer`] error.
    pub fn programmer(message: impl Into<String>) -> Self {
        Error::Programmer(message.into())
    }
}
