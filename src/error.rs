// src/error.rs
//! Public error type for the entire crate
//!
//! Configuration and connection failures are always re-wrapped with the
//! offending logical database key before they reach a caller. No variant
//! ever carries key material or passwords in its message.

use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::CryptoError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("database configuration not found at: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("missing required configuration field: {0}")]
    MissingField(&'static str),

    #[error("invalid port number: {0}")]
    InvalidPort(u32),

    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),

    #[error("configuration load failed for {db_key}: {source}")]
    ConfigLoad {
        db_key: String,
        #[source]
        source: Box<Error>,
    },

    #[error("connection failed for database {db_key}: {source}")]
    Connection {
        db_key: String,
        #[source]
        source: Box<Error>,
    },

    #[error("database connection {0} is not established")]
    NotEstablished(String),

    #[error("database driver error: {0}")]
    Driver(String),
}

impl Error {
    /// Wrap a driver-specific failure raised inside a [`Connector`](crate::registry::Connector)
    pub fn driver(message: impl Into<String>) -> Self {
        Error::Driver(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
