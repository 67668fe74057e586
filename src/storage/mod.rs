//! Storage Module
//!
//! Keyed store facade over the browser's session and local stores, with
//! lazy TTL expiry and optional encryption.

mod backend;
mod envelope;
mod kind;
mod store;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;


// Re-export public types
pub use backend::{MemoryStorage, StorageBackend};
pub use envelope::Envelope;
pub use kind::StoreKind;
pub use store::KeyedStore;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::WebStorage;
