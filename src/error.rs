//! Error types for undoc library.

use std::io;
use thiserror::Error;

use crate::detect::DocumentFormat;

/// Result type alias for undoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The type hint is not handled by the configured extractors.
    #[error("Unsupported format: {0:?}")]
    UnsupportedFormat(String),

    /// The document bytes are malformed for the detected format.
    #[error("{format} parsing error: {message}")]
    Parse {
        format: DocumentFormat,
        message: String,
    },

    /// The document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// The source object does not exist.
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The object store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The trigger notification is malformed.
    #[error("Invalid event: {0}")]
    Event(String),

    /// Invalid handler configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error while writing the artifact.
    #[error("Rendering error: {0}")]
    Render(String),
}

/// Coarse classification of an [`Error`], used by callers to decide on
/// retry and dead-letter policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    Parse,
    Storage,
    NotFound,
    Io,
    Event,
    Config,
    Render,
}

impl Error {
    /// Build a parse error for the given format.
    pub fn parse(format: DocumentFormat, message: impl ToString) -> Self {
        Error::Parse {
            format,
            message: message.to_string(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Error::Parse { .. } | Error::Encrypted => ErrorKind::Parse,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Storage(_) => ErrorKind::Storage,
            Error::Event(_) => ErrorKind::Event,
            Error::Config(_) => ErrorKind::Config,
            Error::Render(_) => ErrorKind::Render,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Render(err.to_string())
    }
}
