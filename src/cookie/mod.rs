//! Cookie Module
//!
//! Cookie facade over the ambient cookie jar with default attributes and
//! optional value encryption.

mod header;
mod jar;
mod store;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

// Re-export public types
pub use header::{decode_component, encode_component, parse_expires, EPOCH_EXPIRES};
pub use jar::{CookieJar, MemoryCookieJar};
pub use store::CookieStore;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::DocumentCookieJar;
