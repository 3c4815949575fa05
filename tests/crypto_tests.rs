// tests/crypto_tests.rs
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use encrypted_db_registry::consts::{NOISE_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
use encrypted_db_registry::crypto::{ConfigCipher, CryptoError};

const MASTER_KEY: &str = "0a3f9c-combined-digest-for-tests";

fn cipher() -> ConfigCipher {
    ConfigCipher::new("aux-key-for-tests")
}

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let c = cipher();
    let plaintext = br#"{"dbName":"samsatnew","dbPassword":"hunter2"}"#;

    let envelope = c.encrypt(plaintext, MASTER_KEY).unwrap();
    let decrypted = c.decrypt(&envelope, MASTER_KEY).unwrap();

    assert!(envelope.starts_with("v2:"));
    assert_eq!(decrypted, plaintext);
}

#[test]
fn test_empty_plaintext_roundtrip() {
    let c = cipher();
    let envelope = c.encrypt(b"", MASTER_KEY).unwrap();
    assert_eq!(c.decrypt(&envelope, MASTER_KEY).unwrap(), b"");
}

#[test]
fn test_payload_layout_is_fixed() {
    let c = cipher();
    let plaintext = b"exactly twenty bytes";

    let envelope = c.encrypt(plaintext, MASTER_KEY).unwrap();
    let payload = STANDARD.decode(&envelope["v2:".len()..]).unwrap();

    // salt ‖ nonce ‖ tag ‖ ciphertext, ciphertext = plaintext + noise
    assert_eq!(
        payload.len(),
        SALT_LEN + NONCE_LEN + TAG_LEN + plaintext.len() + NOISE_LEN
    );
}

#[test]
fn test_fresh_randomness_each_call() {
    let c = cipher();
    let e1 = c.encrypt(b"same input", MASTER_KEY).unwrap();
    let e2 = c.encrypt(b"same input", MASTER_KEY).unwrap();
    assert_ne!(e1, e2);
    assert_eq!(c.decrypt(&e1, MASTER_KEY).unwrap(), b"same input");
    assert_eq!(c.decrypt(&e2, MASTER_KEY).unwrap(), b"same input");
}

#[test]
fn test_wrong_master_key_fails() {
    let c = cipher();
    let envelope = c.encrypt(b"secret", MASTER_KEY).unwrap();
    let err = c.decrypt(&envelope, "some-other-key").unwrap_err();
    assert_eq!(err, CryptoError::DecryptionFailed);
}

#[test]
fn test_wrong_aux_key_fails() {
    let envelope = cipher().encrypt(b"secret", MASTER_KEY).unwrap();
    let other = ConfigCipher::new("different-aux");
    let err = other.decrypt(&envelope, MASTER_KEY).unwrap_err();
    assert_eq!(err, CryptoError::DecryptionFailed);
}

#[test]
fn test_tampering_any_region_is_detected() {
    let c = cipher();
    let envelope = c.encrypt(b"integrity matters", MASTER_KEY).unwrap();
    let payload = STANDARD.decode(&envelope["v2:".len()..]).unwrap();

    // one bit flip in each region: salt, nonce, tag, ciphertext start, end
    let positions = [
        0,
        SALT_LEN,
        SALT_LEN + NONCE_LEN,
        SALT_LEN + NONCE_LEN + TAG_LEN,
        payload.len() - 1,
    ];
    for pos in positions {
        let mut tampered = payload.clone();
        tampered[pos] ^= 0x01;
        let forged = format!("v2:{}", STANDARD.encode(&tampered));
        let err = c.decrypt(&forged, MASTER_KEY).unwrap_err();
        assert_eq!(err, CryptoError::DecryptionFailed, "byte {pos}");
    }
}

#[test]
fn test_rejects_legacy_and_unknown_versions() {
    let c = cipher();
    let envelope = c.encrypt(b"payload", MASTER_KEY).unwrap();
    let body = &envelope["v2:".len()..];

    for bad in [
        format!("v1:{body}"),
        format!("v3:{body}"),
        format!("V2:{body}"),
        body.to_string(), // no version tag at all
    ] {
        let err = c.decrypt(&bad, MASTER_KEY).unwrap_err();
        assert_eq!(err, CryptoError::UnsupportedVersion, "input {bad:.8}");
    }
}

#[test]
fn test_rejects_malformed_base64() {
    let err = cipher().decrypt("v2:!!!not-base64!!!", MASTER_KEY).unwrap_err();
    assert_eq!(err, CryptoError::Malformed);
}

#[test]
fn test_rejects_truncated_payload() {
    // well-formed base64 that is too short to hold salt+nonce+tag+noise
    let short = STANDARD.encode([0u8; 40]);
    let err = cipher()
        .decrypt(&format!("v2:{short}"), MASTER_KEY)
        .unwrap_err();
    assert_eq!(err, CryptoError::Malformed);
}
