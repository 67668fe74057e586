//! Browser storage backends
//!
//! `StorageBackend` over `window.sessionStorage` and `window.localStorage`.

use wasm_bindgen::JsValue;

use crate::error::{Result, StashError};
use crate::storage::{KeyedStore, StorageBackend, StoreKind};

fn js_error(err: JsValue) -> StashError {
    StashError::Storage(format!("{:?}", err))
}

/// A native browser `Storage` object.
pub struct WebStorage {
    inner: web_sys::Storage,
}

impl WebStorage {
    /// Opens the browser store for `kind`.
    pub fn open(kind: StoreKind) -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StashError::Storage("No global window".to_string()))?;
        let storage = match kind {
            StoreKind::Session => window.session_storage(),
            StoreKind::Local => window.local_storage(),
        }
        .map_err(js_error)?
        .ok_or_else(|| StashError::Storage(format!("{} is unavailable", kind)))?;

        Ok(Self { inner: storage })
    }
}

impl StorageBackend for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.inner.remove_item(key).map_err(js_error)
    }

    fn clear(&self) -> Result<()> {
        self.inner.clear().map_err(js_error)
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        let Ok(index) = u32::try_from(index) else {
            return Ok(None);
        };
        self.inner.key(index).map_err(js_error)
    }

    fn length(&self) -> Result<usize> {
        Ok(self.inner.length().map_err(js_error)? as usize)
    }
}

impl KeyedStore {
    /// Creates a store over the page's `sessionStorage` and `localStorage`.
    pub fn browser() -> Result<Self> {
        Ok(Self::new(
            WebStorage::open(StoreKind::Session)?,
            WebStorage::open(StoreKind::Local)?,
        ))
    }
}
