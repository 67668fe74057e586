//! Crypto Module
//!
//! Password-based symmetric encryption shared by the keyed store and the cookie facade.
//!
//! Each message derives its own AES-256-GCM key from the secret and a random salt
//! with Argon2id. The textual form is standard base64 of
//! `salt || nonce || ciphertext+tag`.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::error::{Result, StashError};

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;

// Argon2id cost: 19 MiB, 2 passes, 1 lane
const KDF_MEMORY_KIB: u32 = 19 * 1024;
const KDF_ITERATIONS: u32 = 2;
const KDF_PARALLELISM: u32 = 1;

/// Stretches `secret` into an AES-256 key with Argon2id.
fn derive_key(secret: &str, salt: &[u8]) -> std::result::Result<[u8; KEY_LEN], String> {
    let params = Params::new(KDF_MEMORY_KIB, KDF_ITERATIONS, KDF_PARALLELISM, Some(KEY_LEN))
        .map_err(|e| format!("Invalid key derivation parameters: {}", e))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(secret.as_bytes(), salt, &mut key)
        .map_err(|e| format!("Key derivation failed: {}", e))?;
    Ok(key)
}

fn derive_cipher(secret: &str, salt: &[u8]) -> std::result::Result<Aes256Gcm, String> {
    let key = derive_key(secret, salt)?;
    Aes256Gcm::new_from_slice(&key).map_err(|e| format!("Failed to create cipher: {}", e))
}

// == Encrypt ==
/// Encrypts `plaintext` under `secret`, returning base64 text.
pub fn encrypt(plaintext: &str, secret: &str) -> Result<String> {
    let mut rng = rand::thread_rng();
    let mut salt = [0u8; SALT_LEN];
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce_bytes);

    let cipher = derive_cipher(secret, &salt).map_err(StashError::EncryptionFailed)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|e| StashError::EncryptionFailed(e.to_string()))?;

    let mut sealed = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&salt);
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(sealed))
}

// == Decrypt ==
/// Decrypts base64 text produced by [`encrypt`].
///
/// Fails on malformed input, on a wrong secret, and on plaintext that is not UTF-8.
pub fn decrypt(ciphertext: &str, secret: &str) -> Result<String> {
    let sealed = STANDARD
        .decode(ciphertext.trim())
        .map_err(|e| StashError::DecryptionFailed(format!("Invalid base64: {}", e)))?;

    if sealed.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
        return Err(StashError::DecryptionFailed(
            "Ciphertext too short".to_string(),
        ));
    }

    let (salt, rest) = sealed.split_at(SALT_LEN);
    let (nonce_bytes, body) = rest.split_at(NONCE_LEN);

    let cipher = derive_cipher(secret, salt).map_err(StashError::DecryptionFailed)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), body)
        .map_err(|_| StashError::DecryptionFailed("Authentication failed".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| StashError::DecryptionFailed(format!("Plaintext is not UTF-8: {}", e)))
}
