//! Store selector
//!
//! Names one of the two native key-value stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StashError;

/// Which native key-value store an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Scoped to the browsing session (`sessionStorage`)
    Session,
    /// Durable per origin (`localStorage`)
    Local,
}

impl StoreKind {
    /// Name of the browser global backing this store.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Session => "sessionStorage",
            StoreKind::Local => "localStorage",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreKind {
    type Err = StashError;

    /// Accepts `session`/`sessionStorage` and `local`/`localStorage`, ignoring case.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "session" | "sessionstorage" => Ok(StoreKind::Session),
            "local" | "localstorage" => Ok(StoreKind::Local),
            _ => Err(StashError::InvalidStoreKind(tag.to_string())),
        }
    }
}
