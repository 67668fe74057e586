//! Browser Stash - Session, local and cookie storage facades
//!
//! Provides a uniform API over the browser's key-value stores and cookie jar,
//! with lazy TTL expiry and optional symmetric encryption of stored values.

pub mod clock;
pub mod config;
pub mod cookie;
pub mod crypto;
pub mod error;
pub mod models;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CookieDefaults;
pub use cookie::{CookieJar, CookieStore, MemoryCookieJar};
pub use error::{Result, StashError};
pub use models::{CookieRecord, PutOptions, SameSite};
pub use storage::{KeyedStore, MemoryStorage, StorageBackend, StoreKind};

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use cookie::DocumentCookieJar;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use storage::WebStorage;
