//! Configuration Module
//!
//! Process-wide cookie attribute defaults, merged as a fallback into every cookie write.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::SameSite;

/// Cookie attributes applied when a record does not set its own.
///
/// All fields start unset. Values are layered with [`CookieDefaults::merge`], which
/// only overwrites the fields the incoming options actually carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieDefaults {
    /// Default `path` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Default `domain` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Default `secure` flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    /// Default `samesite` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

impl CookieDefaults {
    /// Creates an empty set of defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the default domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the default secure flag.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Sets the default samesite policy.
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Loads defaults from a JSON object such as `{"domain": "example.com", "secure": true}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    // == Merge ==
    /// Layers `other` on top of `self`; unset fields in `other` leave `self` untouched.
    pub fn merge(&mut self, other: CookieDefaults) {
        if other.path.is_some() {
            self.path = other.path;
        }
        if other.domain.is_some() {
            self.domain = other.domain;
        }
        if other.secure.is_some() {
            self.secure = other.secure;
        }
        if other.same_site.is_some() {
            self.same_site = other.same_site;
        }
    }
}
