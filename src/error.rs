//! Error types for the storage facades
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Stash Error Enum ==
/// Unified error type for the keyed store and cookie facades.
#[derive(Error, Debug)]
pub enum StashError {
    /// Store selector tag did not name a known store
    #[error("Invalid store kind: {0}")]
    InvalidStoreKind(String),

    /// TTL or cookie expiry could not be accepted
    #[error("Invalid expiry: {0}")]
    InvalidExpiry(String),

    /// Cookie max-age was negative
    #[error("Invalid max-age: {0}")]
    InvalidMaxAge(i64),

    /// Encryption was requested without a secret key
    #[error("Secret key is required for encryption")]
    MissingSecretKey,

    /// A required record field was empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Lookup key was empty
    #[error("Key cannot be empty")]
    MissingKey,

    /// Key list was empty or contained an empty key
    #[error("Invalid keys: {0}")]
    InvalidKeys(String),

    /// Ciphertext could not be decoded or authenticated
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Plaintext could not be sealed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Value could not be converted to or from JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The underlying storage or cookie jar rejected the call
    #[error("Storage error: {0}")]
    Storage(String),
}

// == Result Type Alias ==
/// Convenience Result type for the storage facades.
pub type Result<T> = std::result::Result<T, StashError>;
