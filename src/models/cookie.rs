//! Cookie write records
//!
//! Defines a single cookie write: name, value and transient attributes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StashError};

/// `SameSite` cookie policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    /// Attribute value as written in a cookie string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A cookie to write.
///
/// # Fields
/// - `key` / `value`: Cookie name and plaintext value, both required
/// - `expires`: Date string (RFC 3339, RFC 2822 or `YYYY-MM-DD`)
/// - `max_age`: Lifetime in seconds, must be non-negative
/// - `path`, `domain`, `secure`, `same_site`: Fall back to the store defaults when unset
/// - `encrypt` / `secret_key`: Encrypt the value before writing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    /// Cookie name
    pub key: String,
    /// Cookie value
    pub value: String,
    /// Absolute expiry date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    /// Relative lifetime in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
    /// Whether to encrypt the value
    #[serde(default)]
    pub encrypt: bool,
    /// Secret key for encryption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl CookieRecord {
    /// Creates a session cookie with no attributes.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn expires(mut self, expires: impl Into<String>) -> Self {
        self.expires = Some(expires.into());
        self
    }

    /// Sets `expires` from a UTC timestamp.
    pub fn expires_at(mut self, at: chrono::DateTime<chrono::Utc>) -> Self {
        self.expires = Some(at.to_rfc3339());
        self
    }

    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Encrypts the value under `secret_key` when written.
    pub fn encrypted(mut self, secret_key: impl Into<String>) -> Self {
        self.encrypt = true;
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Checks that both name and value are present.
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(StashError::MissingField("key"));
        }
        if self.value.is_empty() {
            return Err(StashError::MissingField("value"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_record_deserialize() {
        let json = r#"{"key": "theme", "value": "dark", "maxAge": 60, "sameSite": "lax"}"#;
        let record: CookieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.key, "theme");
        assert_eq!(record.value, "dark");
        assert_eq!(record.max_age, Some(60));
        assert_eq!(record.same_site, Some(SameSite::Lax));
        assert!(!record.encrypt);
    }

    #[test]
    fn test_validate_empty_key() {
        let record = CookieRecord::new("", "v");
        assert!(matches!(record.validate(), Err(StashError::MissingField("key"))));
    }

    #[test]
    fn test_validate_empty_value() {
        let record = CookieRecord::new("k", "");
        assert!(matches!(record.validate(), Err(StashError::MissingField("value"))));
    }

    #[test]
    fn test_validate_valid_record() {
        let record = CookieRecord::new("k", "v").max_age(10).secure(true);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_same_site_as_str() {
        assert_eq!(SameSite::Strict.as_str(), "Strict");
        assert_eq!(SameSite::Lax.as_str(), "Lax");
        assert_eq!(SameSite::None.as_str(), "None");
    }
}
