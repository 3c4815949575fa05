// src/lib.rs
//! encrypted-db-registry — encrypted database credentials + connection registry
//!
//! Features:
//! - AES-256-GCM envelopes keyed by PBKDF2-HMAC-SHA512 derived keys
//! - Deterministic on-disk codec for per-environment config files
//! - Single-flight registry of pooled connections, keyed by logical db key
//! - Query log sanitization with request correlation

pub mod codec;
pub mod consts;
pub mod crypto;
pub mod dbconfig;
pub mod dialect;
pub mod error;
pub mod logging;
pub mod registry;
pub mod settings;

// Re-export everything users need at the crate root
pub use crypto::{ConfigCipher, CryptoError};
pub use dbconfig::DatabaseConfig;
pub use dialect::{Dialect, DialectOptions, TlsMode};
pub use error::{Error, Result};
pub use registry::{
    ConnectOptions, ConnectionRegistry, Connector, IsolationLevel, PoolOptions,
    TransactionOptions,
};
pub use settings::Secrets;
