//! Domain error types
//!
//! Storage and transport failures are contained per widget; none of these
//! reach the person using the panel directly.

use thiserror::Error;

/// Faults raised by a session storage backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageFault {
    /// Storage is disabled or missing in this environment
    #[error("Session storage unavailable")]
    Unavailable,

    /// Writing would exceed the storage quota
    #[error("Session storage quota exceeded: {needed}/{quota} bytes")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Stored data could not be decoded
    #[error("Session storage corrupted: {0}")]
    Corrupted(String),

    /// Underlying medium failed (file system, lock poisoning)
    #[error("Session storage I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageFault {
    fn from(err: std::io::Error) -> Self {
        StorageFault::Io(err.to_string())
    }
}

/// Transport-level failures fetching a widget
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, timeout, TLS and similar client errors
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Body was not the expected JSON document
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Endpoint URL could not be built from the site root
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid site root '{0}'")]
    InvalidWwwroot(String),
}
