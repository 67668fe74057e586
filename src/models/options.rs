//! Keyed store write options
//!
//! Controls expiry and encryption of a single `put`.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, StashError};

/// Options for a keyed store write.
///
/// # Fields
/// - `ttl`: Optional time-to-live; the entry expires lazily once it elapses
/// - `encrypt`: Encrypt the serialized envelope before storing
/// - `secret_key`: Secret used when `encrypt` is set
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutOptions {
    /// Time-to-live measured from the write
    #[serde(default, deserialize_with = "millis::deserialize")]
    pub ttl: Option<Duration>,
    /// Whether to encrypt the stored text
    #[serde(default)]
    pub encrypt: bool,
    /// Secret key for encryption
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl PutOptions {
    /// Plain write: no expiry, no encryption.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expires the entry `ttl` after the write.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Shorthand for [`PutOptions::ttl`] in milliseconds.
    pub fn ttl_ms(self, ttl_ms: u64) -> Self {
        self.ttl(Duration::from_millis(ttl_ms))
    }

    /// Encrypts the stored value under `secret_key`.
    pub fn encrypted(mut self, secret_key: impl Into<String>) -> Self {
        self.encrypt = true;
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Validates the TTL, returning it in milliseconds.
    ///
    /// A TTL must be strictly positive and fit in a signed millisecond count.
    pub fn ttl_millis(&self) -> Result<Option<u64>> {
        let Some(ttl) = self.ttl else {
            return Ok(None);
        };
        let ms = ttl.as_millis();
        if ms == 0 {
            return Err(StashError::InvalidExpiry(
                "TTL must be greater than zero".to_string(),
            ));
        }
        if ms > i64::MAX as u128 {
            return Err(StashError::InvalidExpiry(format!(
                "TTL of {}ms is out of range",
                ms
            )));
        }
        Ok(Some(ms as u64))
    }

    /// Returns the secret to encrypt with, or `None` for a plaintext write.
    pub fn encryption_key(&self) -> Result<Option<&str>> {
        if !self.encrypt {
            return Ok(None);
        }
        match self.secret_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(Some(key)),
            _ => Err(StashError::MissingSecretKey),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_options_deserialize() {
        let json = r#"{"ttl": 1000, "encrypt": true, "secretKey": "k"}"#;
        let opts: PutOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.ttl, Some(Duration::from_millis(1000)));
        assert!(opts.encrypt);
        assert_eq!(opts.secret_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_put_options_deserialize_empty() {
        let opts: PutOptions = serde_json::from_str("{}").unwrap();
        assert!(opts.ttl.is_none());
        assert!(!opts.encrypt);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let opts = PutOptions::new().ttl(Duration::ZERO);
        assert!(matches!(opts.ttl_millis(), Err(StashError::InvalidExpiry(_))));
    }

    #[test]
    fn test_sub_millisecond_ttl_rejected() {
        let opts = PutOptions::new().ttl(Duration::from_micros(500));
        assert!(matches!(opts.ttl_millis(), Err(StashError::InvalidExpiry(_))));
    }

    #[test]
    fn test_huge_ttl_rejected() {
        let opts = PutOptions::new().ttl(Duration::MAX);
        assert!(matches!(opts.ttl_millis(), Err(StashError::InvalidExpiry(_))));
    }

    #[test]
    fn test_valid_ttl() {
        let opts = PutOptions::new().ttl_ms(1500);
        assert_eq!(opts.ttl_millis().unwrap(), Some(1500));
        assert_eq!(PutOptions::new().ttl_millis().unwrap(), None);
    }

    #[test]
    fn test_encryption_key_required() {
        let opts = PutOptions {
            encrypt: true,
            ..Default::default()
        };
        assert!(matches!(opts.encryption_key(), Err(StashError::MissingSecretKey)));

        let opts = PutOptions::new().encrypted("");
        assert!(matches!(opts.encryption_key(), Err(StashError::MissingSecretKey)));

        let opts = PutOptions::new().encrypted("k");
        assert_eq!(opts.encryption_key().unwrap(), Some("k"));
    }

    #[test]
    fn test_secret_ignored_without_encrypt() {
        let opts = PutOptions {
            secret_key: Some("k".to_string()),
            ..Default::default()
        };
        assert_eq!(opts.encryption_key().unwrap(), None);
    }
}
