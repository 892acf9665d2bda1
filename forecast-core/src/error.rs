use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the remote weather service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never completed (DNS, TLS, connect, timeout, body read).
    #[error("{endpoint} request failed to complete: {source}")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The body could not be decoded into the expected shape.
    #[error("Failed to parse {endpoint} response: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl GatewayError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            GatewayError::Network { endpoint, .. }
            | GatewayError::Status { endpoint, .. }
            | GatewayError::Parse { endpoint, .. } => endpoint,
        }
    }
}

/// Failure reading or writing the preference file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No suitable data directory available for preferences")]
    NoDataDir,

    #[error("Failed to create preference directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read preference file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write preference file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse preference file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// An in-memory store whose lock was poisoned by a panicking writer.
    #[error("Preference store is unavailable")]
    Poisoned,
}
