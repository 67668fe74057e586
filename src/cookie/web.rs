//! Browser cookie jar
//!
//! `CookieJar` over `document.cookie`.

use wasm_bindgen::{JsCast, JsValue};

use crate::cookie::{CookieJar, CookieStore};
use crate::error::{Result, StashError};

fn js_error(err: JsValue) -> StashError {
    StashError::Storage(format!("{:?}", err))
}

/// The page's `document.cookie`.
pub struct DocumentCookieJar {
    document: web_sys::HtmlDocument,
}

impl DocumentCookieJar {
    pub fn new() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| StashError::Storage("No global document".to_string()))?
            .dyn_into::<web_sys::HtmlDocument>()
            .map_err(|_| StashError::Storage("Document is not an HTML document".to_string()))?;

        Ok(Self { document })
    }
}

impl CookieJar for DocumentCookieJar {
    fn read(&self) -> Result<String> {
        self.document.cookie().map_err(js_error)
    }

    fn write(&self, cookie: &str) -> Result<()> {
        self.document.set_cookie(cookie).map_err(js_error)
    }
}

impl CookieStore<DocumentCookieJar> {
    /// Creates a store over the page's cookie jar.
    pub fn browser() -> Result<Self> {
        Ok(Self::new(DocumentCookieJar::new()?))
    }
}
