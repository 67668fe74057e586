//! Option and record types accepted by the storage facades
//!
//! This module defines the caller-facing inputs for keyed store writes and
//! cookie writes, deserializable from camelCase JSON.

pub mod cookie;
pub mod options;

// Re-export commonly used types
pub use cookie::{CookieRecord, SameSite};
pub use options::PutOptions;
