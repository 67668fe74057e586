//! Envelope Module
//!
//! Defines the stored form of a keyed store value with optional TTL metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crypto;
use crate::error::Result;

// == Envelope ==
/// Wrapper persisted in place of the raw value.
///
/// Serializes as `{"value": ..}` or `{"value": .., "createdAt": .., "ttl": ..}`;
/// the timestamp fields are written only for entries that expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The stored value
    pub value: Value,
    /// Write timestamp (Unix milliseconds)
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<i64>,
    /// Time-to-live in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl Envelope {
    // == Constructor ==
    /// Wraps `value`, stamping `now_ms` only when a TTL is given.
    pub fn new(value: Value, ttl_ms: Option<u64>, now_ms: i64) -> Self {
        match ttl_ms {
            Some(ttl) => Self {
                value,
                created_at: Some(now_ms),
                ttl: Some(ttl),
            },
            None => Self {
                value,
                created_at: None,
                ttl: None,
            },
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once `now - createdAt >= ttl`. Entries missing either
    /// field never expire.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        match (self.created_at, self.ttl) {
            (Some(created_at), Some(ttl)) => {
                let age = now_ms.saturating_sub(created_at);
                age >= 0 && age as u64 >= ttl
            }
            _ => false,
        }
    }

    // == Seal ==
    /// Serializes to JSON text, encrypting it when a secret is given.
    pub fn seal(&self, secret_key: Option<&str>) -> Result<String> {
        let json = serde_json::to_string(self)?;
        match secret_key {
            Some(key) => crypto::encrypt(&json, key),
            None => Ok(json),
        }
    }

    // == Open ==
    /// Reverses [`Envelope::seal`].
    pub fn open(raw: &str, secret_key: Option<&str>) -> Result<Self> {
        match secret_key {
            Some(key) => {
                let json = crypto::decrypt(raw, key)?;
                Ok(serde_json::from_str(&json)?)
            }
            None => Ok(serde_json::from_str(raw)?),
        }
    }
}
