// src/codec.rs
//! Encrypted config files on disk
//!
//! Thin file I/O over the pure crypto engine: deterministic paths,
//! whole-file envelopes, JSON (de)serialization of [`DatabaseConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::consts::CONFIG_DIR;
use crate::crypto::ConfigCipher;
use crate::dbconfig::DatabaseConfig;
use crate::error::{Error, Result};

/// `<root>/databases/<environment>_<db_key>.enc.ini`
pub fn config_path(root: &Path, environment: &str, db_key: &str) -> PathBuf {
    root.join(CONFIG_DIR)
        .join(format!("{environment}_{db_key}.enc.ini"))
}

/// Combine the two environment-provided secrets into the master key
/// handed to the cipher: hex-encoded SHA-256 of their concatenation.
pub fn combined_key(master: &str, additional: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(master.as_bytes());
    hasher.update(additional.as_bytes());
    hex::encode(hasher.finalize())
}

/// Encrypt `plaintext` and write the envelope as the file's entire contents.
pub fn write_encrypted(
    cipher: &ConfigCipher,
    path: &Path,
    plaintext: &[u8],
    master_key: &str,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let envelope = cipher.encrypt(plaintext, master_key)?;
    fs::write(path, envelope)?;
    Ok(())
}

/// Read, decrypt, and parse an encrypted [`DatabaseConfig`] file.
pub fn read_decrypted(
    cipher: &ConfigCipher,
    path: &Path,
    master_key: &str,
) -> Result<DatabaseConfig> {
    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let envelope = fs::read_to_string(path)?;
    let plaintext = cipher.decrypt(envelope.trim_end(), master_key)?;
    let config: DatabaseConfig = serde_json::from_slice(&plaintext)?;
    Ok(config)
}
