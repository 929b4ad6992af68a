//! Error types for tracewrap

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// tracewrap errors
///
/// One variant per pipeline stage; every stage wraps the first failure it
/// sees with enough context (method name, rule name, path) to act on it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("failed to load package: {0}")]
    Load(String),

    #[error("interface '{interface}' not found in package '{package}'")]
    NotFound { package: String, interface: String },

    #[error("'{0}' is not an interface")]
    NotAnInterface(String),

    #[error("method '{method}' failed rule '{rule}': {reason}")]
    Validation {
        method: String,
        rule: String,
        reason: String,
    },

    #[error("failed to normalize signature: {0}")]
    Extraction(String),

    #[error("render error: {0}")]
    Template(String),

    #[error("failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Usage(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Usage(s)
    }
}
