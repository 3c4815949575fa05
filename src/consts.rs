// src/consts.rs
//! Shared constants — security parameters and connection defaults

/// PBKDF2-HMAC-SHA512 iterations for config-file keys
// Intentionally slow — a config file is decrypted once per process
pub const KDF_ITERATIONS: u32 = 100_000;

/// Random salt prepended to every envelope payload
pub const SALT_LEN: usize = 32;

/// AES-GCM authentication tag
pub const TAG_LEN: usize = 16;

/// Derived AES-256 key
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce
pub const NONCE_LEN: usize = 12;

/// Random padding appended to the plaintext before encryption,
/// stripped again after decryption
pub const NOISE_LEN: usize = 32;

/// The only envelope version the decryptor accepts
pub const ENVELOPE_VERSION: &str = "v2";

/// Directory under the config root holding encrypted config files
pub const CONFIG_DIR: &str = "databases";

/// Environment name used when `NODE_ENV` is unset
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Maximum pooled connections per logical database key
pub const POOL_MAX: u32 = 100;

/// Idle connections the pool keeps warm
pub const POOL_MIN_IDLE: u32 = 10;

/// Bounded wait for a connection from the pool before failing
pub const POOL_ACQUIRE_TIMEOUT_SECS: u64 = 60;

/// Idle connections are evicted after this long
pub const POOL_IDLE_TIMEOUT_SECS: u64 = 600;

/// Driver-level connect timeout applied to every dialect
pub const CONNECT_TIMEOUT_SECS: u64 = 60;
