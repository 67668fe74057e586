//! Keyed Store Module
//!
//! Facade over the session and local stores with lazy TTL expiry and optional encryption.

use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::models::PutOptions;
use crate::storage::{Envelope, MemoryStorage, StorageBackend, StoreKind};

// == Keyed Store ==
/// Reads and writes enveloped values in one of two native key-value stores.
///
/// Nothing is cached: every read goes back to the backend and re-parses.
pub struct KeyedStore {
    /// Backend for `StoreKind::Session`
    session: Box<dyn StorageBackend>,
    /// Backend for `StoreKind::Local`
    local: Box<dyn StorageBackend>,
    /// Time source for envelope stamps and expiry checks
    clock: Rc<dyn Clock>,
}

impl KeyedStore {
    // == Constructor ==
    /// Creates a store over the given session and local backends.
    pub fn new(
        session: impl StorageBackend + 'static,
        local: impl StorageBackend + 'static,
    ) -> Self {
        Self {
            session: Box::new(session),
            local: Box::new(local),
            clock: Rc::new(SystemClock),
        }
    }

    /// Creates a store over two fresh in-memory backends.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new(), MemoryStorage::new())
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn backend(&self, kind: StoreKind) -> &dyn StorageBackend {
        match kind {
            StoreKind::Session => self.session.as_ref(),
            StoreKind::Local => self.local.as_ref(),
        }
    }

    // == Put ==
    /// Stores `value` under `key`.
    ///
    /// The value is wrapped in an envelope, serialized to JSON and, when
    /// requested, encrypted before being written.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - Any serializable value
    /// * `kind` - Target store
    /// * `options` - TTL and encryption settings
    pub fn put<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        kind: StoreKind,
        options: &PutOptions,
    ) -> Result<()> {
        let ttl = options.ttl_millis()?;
        let secret_key = options.encryption_key()?;

        let envelope = Envelope::new(serde_json::to_value(value)?, ttl, self.clock.now_ms());
        let stored = envelope.seal(secret_key)?;

        self.backend(kind).set_item(key, &stored)?;
        debug!(
            key,
            store = %kind,
            ttl_ms = ?ttl,
            encrypted = secret_key.is_some(),
            "Stored value"
        );
        Ok(())
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// Returns `None` when the key is absent, when the stored text cannot be
    /// decrypted or parsed (logged as a warning), or when the entry has expired.
    /// Expired entries are removed as part of the read.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    /// * `kind` - Source store
    /// * `secret_key` - Secret to decrypt with; empty is treated as none
    pub fn get(
        &self,
        key: &str,
        kind: StoreKind,
        secret_key: Option<&str>,
    ) -> Result<Option<Value>> {
        let backend = self.backend(kind);
        let Some(raw) = backend.get_item(key)? else {
            return Ok(None);
        };

        let secret_key = secret_key.filter(|k| !k.is_empty());
        let envelope = match Envelope::open(&raw, secret_key) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(key, store = %kind, error = %err, "Failed to read stored value");
                return Ok(None);
            }
        };

        if envelope.is_expired(self.clock.now_ms()) {
            backend.remove_item(key)?;
            debug!(key, store = %kind, "Removed expired entry on read");
            return Ok(None);
        }

        Ok(Some(envelope.value))
    }

    // == Get As ==
    /// Like [`KeyedStore::get`], deserializing the value into `T`.
    ///
    /// A value that does not match `T` is a `Serialization` error.
    pub fn get_as<T: DeserializeOwned>(
        &self,
        key: &str,
        kind: StoreKind,
        secret_key: Option<&str>,
    ) -> Result<Option<T>> {
        match self.get(key, kind, secret_key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    // == Get All ==
    /// Reads every entry in the store, in the backend's enumeration order.
    ///
    /// Each key goes through [`KeyedStore::get`] without a secret, so expired
    /// entries are purged and unreadable ones are left out.
    pub fn get_all(&self, kind: StoreKind) -> Result<Vec<(String, Value)>> {
        let mut values = Vec::new();
        for key in self.keys(kind)? {
            if let Some(value) = self.get(&key, kind, None)? {
                values.push((key, value));
            }
        }
        Ok(values)
    }

    // == Remove ==
    /// Deletes `key`. Absent keys are not an error.
    pub fn remove(&self, key: &str, kind: StoreKind) -> Result<()> {
        self.backend(kind).remove_item(key)?;
        debug!(key, store = %kind, "Removed entry");
        Ok(())
    }

    // == Clear ==
    /// Deletes every entry in the store.
    pub fn clear(&self, kind: StoreKind) -> Result<()> {
        self.backend(kind).clear()?;
        debug!(store = %kind, "Cleared store");
        Ok(())
    }

    // == Has ==
    /// Returns true if a raw entry exists, whether or not it has expired.
    pub fn has(&self, key: &str, kind: StoreKind) -> Result<bool> {
        Ok(self.backend(kind).get_item(key)?.is_some())
    }

    // == Count ==
    /// Returns the number of raw entries, including expired ones not yet read.
    pub fn count(&self, kind: StoreKind) -> Result<usize> {
        self.backend(kind).length()
    }

    // == Keys ==
    /// Returns all raw keys in backend enumeration order.
    pub fn keys(&self, kind: StoreKind) -> Result<Vec<String>> {
        let backend = self.backend(kind);
        let len = backend.length()?;

        let mut keys = Vec::with_capacity(len);
        for index in 0..len {
            if let Some(key) = backend.key(index)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    // == Remove Many ==
    /// Deletes every key in `keys`, continuing past failures.
    ///
    /// Returns true only if every removal succeeded.
    pub fn remove_many<S: AsRef<str>>(&self, keys: &[S], kind: StoreKind) -> bool {
        let mut all_removed = true;
        for key in keys {
            let key = key.as_ref();
            if let Err(err) = self.remove(key, kind) {
                warn!(key, store = %kind, error = %err, "Failed to remove entry");
                all_removed = false;
            }
        }
        all_removed
    }

    // == Purge Expired ==
    /// Removes every plaintext entry whose TTL has elapsed.
    ///
    /// Only runs when called. Encrypted and unparseable entries are skipped.
    /// Returns the number of entries removed.
    pub fn purge_expired(&self, kind: StoreKind) -> Result<usize> {
        let backend = self.backend(kind);
        let now = self.clock.now_ms();

        let mut removed = 0;
        for key in self.keys(kind)? {
            let Some(raw) = backend.get_item(&key)? else {
                continue;
            };
            if let Ok(envelope) = Envelope::open(&raw, None) {
                if envelope.is_expired(now) {
                    backend.remove_item(&key)?;
                    removed += 1;
                }
            }
        }

        debug!(store = %kind, removed, "Purged expired entries");
        Ok(removed)
    }
}
