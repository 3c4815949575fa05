// src/crypto.rs
//! Pure cryptographic engine — no I/O, no registry state
//!
//! Everything here works on in-memory buffers: PBKDF2-HMAC-SHA512 key
//! derivation and the versioned AES-256-GCM envelope format
//! `v2:<base64(salt ‖ nonce ‖ tag ‖ ciphertext)>`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha512;
use thiserror::Error;
use zeroize::Zeroize;

use crate::consts::{
    ENVELOPE_VERSION, KDF_ITERATIONS, KEY_LEN, NOISE_LEN, NONCE_LEN, SALT_LEN, TAG_LEN,
};

/// Errors raised by envelope encryption/decryption.
///
/// Deliberately coarse: a caller learns that decryption failed, never
/// which byte differed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    #[error("unsupported encryption version")]
    UnsupportedVersion,

    #[error("malformed envelope")]
    Malformed,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,
}

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Authenticated encryption for serialized configuration.
///
/// The auxiliary key is mixed into the KDF input alongside the caller's
/// master key, binding envelopes to the deployment that wrote them.
#[derive(Clone)]
pub struct ConfigCipher {
    aux_key: String,
}

impl ConfigCipher {
    pub fn new(aux_key: impl Into<String>) -> Self {
        Self {
            aux_key: aux_key.into(),
        }
    }

    /// Build from `ENCRYPTION_ENV_KEY`; unset means no auxiliary input.
    pub fn from_env() -> Self {
        Self::new(std::env::var(crate::settings::ENV_AUX_KEY).unwrap_or_default())
    }

    fn derive_key(&self, master_key: &str, salt: &[u8]) -> [u8; KEY_LEN] {
        let mut material = format!("{master_key}:{}", self.aux_key);
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha512>(material.as_bytes(), salt, KDF_ITERATIONS, &mut key);
        material.zeroize();
        key
    }

    /// Encrypt `plaintext` into a `v2:` envelope under a fresh salt and nonce.
    ///
    /// [`NOISE_LEN`] random bytes are appended to the plaintext before
    /// encryption so the envelope length does not track the payload length
    /// exactly; [`decrypt`](Self::decrypt) strips them again.
    pub fn encrypt(&self, plaintext: &[u8], master_key: &str) -> Result<String> {
        let mut rng = rand::rng();
        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let mut noise = [0u8; NOISE_LEN];
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);
        rng.fill_bytes(&mut noise);

        let mut key = self.derive_key(master_key, &salt);
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::EncryptionFailed)?;
        key.zeroize();

        let mut mixed = Vec::with_capacity(plaintext.len() + NOISE_LEN);
        mixed.extend_from_slice(plaintext);
        mixed.extend_from_slice(&noise);

        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), mixed.as_slice())
            .map_err(|_| CryptoError::EncryptionFailed)?;
        mixed.zeroize();

        // aes-gcm appends the tag; the envelope stores it *before* the ciphertext
        let split = sealed.len() - TAG_LEN;
        let mut payload = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
        payload.extend_from_slice(&salt);
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&sealed[split..]);
        payload.extend_from_slice(&sealed[..split]);

        Ok(format!("{ENVELOPE_VERSION}:{}", STANDARD.encode(payload)))
    }

    /// Decrypt a `v2:` envelope and strip the trailing noise bytes.
    ///
    /// Any version tag other than `v2` is rejected before key derivation
    /// or cipher work happens.
    pub fn decrypt(&self, envelope: &str, master_key: &str) -> Result<Vec<u8>> {
        let (version, data) = envelope
            .split_once(':')
            .ok_or(CryptoError::UnsupportedVersion)?;
        if version != ENVELOPE_VERSION {
            return Err(CryptoError::UnsupportedVersion);
        }

        let payload = STANDARD.decode(data).map_err(|_| CryptoError::Malformed)?;
        // the ciphertext covers plaintext + noise, so it is never shorter than NOISE_LEN
        if payload.len() < SALT_LEN + NONCE_LEN + TAG_LEN + NOISE_LEN {
            return Err(CryptoError::Malformed);
        }

        let (salt, rest) = payload.split_at(SALT_LEN);
        let (nonce, rest) = rest.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        let mut key = self.derive_key(master_key, salt);
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::DecryptionFailed)?;
        key.zeroize();

        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let mut mixed = cipher
            .decrypt(Nonce::from_slice(nonce), sealed.as_slice())
            .map_err(|_| CryptoError::DecryptionFailed)?;

        mixed.truncate(mixed.len() - NOISE_LEN);
        Ok(mixed)
    }
}
