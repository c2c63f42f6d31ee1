//! Catalog error taxonomy.

use thiserror::Error;

/// Failure of the transport port (network / HTTP).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error ({0}): {1}")]
    Status(u16, String),
    #[error("no response scripted for {0}")]
    Unavailable(String),
}

/// Malformed or schema-mismatched catalog payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("catalog decode failed at line {line}, column {column}: {cause}")]
pub struct DecodeError {
    pub cause: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            cause: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Terminal failure of one catalog fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("request was cancelled")]
    Cancelled,
    #[error("no async runtime available to run the request")]
    NoRuntime,
}
