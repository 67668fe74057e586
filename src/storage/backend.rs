//! Storage Backend Module
//!
//! The port through which the keyed store reaches a native key-value store,
//! plus an in-memory implementation.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::Result;

/// Capability set of a browser `Storage` object.
///
/// Methods take `&self`; the browser store is ambient and shared, so
/// implementations use interior mutability.
pub trait StorageBackend {
    /// Returns the raw text stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Succeeds when the key is absent.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Deletes every entry.
    fn clear(&self) -> Result<()>;

    /// Returns the key at `index` in enumeration order.
    fn key(&self, index: usize) -> Result<Option<String>>;

    /// Number of entries.
    fn length(&self) -> Result<usize>;
}

// == Memory Storage ==
/// In-memory `StorageBackend`.
///
/// Clones share the same entries, so a test can keep a handle to inspect what
/// a store wrote. Keys enumerate in sorted order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.items.borrow_mut().clear();
        Ok(())
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        Ok(self.items.borrow().keys().nth(index).cloned())
    }

    fn length(&self) -> Result<usize> {
        Ok(self.items.borrow().len())
    }
}
