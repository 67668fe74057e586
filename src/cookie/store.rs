//! Cookie Store Module
//!
//! Facade over the cookie jar with default attributes and optional value encryption.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::CookieDefaults;
use crate::cookie::header::{
    encode_component, format_http_date, parse_cookie_header, parse_expires, EPOCH_EXPIRES,
};
use crate::cookie::{CookieJar, MemoryCookieJar};
use crate::crypto;
use crate::error::{Result, StashError};
use crate::models::CookieRecord;

/// Drops empty secrets so they behave like no secret at all.
fn usable_secret(secret_key: Option<&str>) -> Option<&str> {
    secret_key.filter(|key| !key.is_empty())
}

// == Cookie Store ==
/// Reads and writes cookies through a [`CookieJar`].
///
/// Holds the default attributes merged into every write; the jar itself is
/// the only source of truth for cookie values.
pub struct CookieStore<J: CookieJar> {
    jar: J,
    defaults: CookieDefaults,
}

impl CookieStore<MemoryCookieJar> {
    /// Creates a store over a fresh in-memory jar.
    pub fn in_memory() -> Self {
        Self::new(MemoryCookieJar::new())
    }
}

impl<J: CookieJar> CookieStore<J> {
    // == Constructor ==
    /// Creates a store with no default attributes.
    pub fn new(jar: J) -> Self {
        Self {
            jar,
            defaults: CookieDefaults::default(),
        }
    }

    /// Creates a store starting from `defaults`.
    pub fn with_defaults(jar: J, defaults: CookieDefaults) -> Self {
        Self { jar, defaults }
    }

    /// The underlying jar.
    pub fn jar(&self) -> &J {
        &self.jar
    }

    /// The current default attributes.
    pub fn defaults(&self) -> &CookieDefaults {
        &self.defaults
    }

    // == Set Defaults ==
    /// Merges `options` into the defaults; unset fields keep their previous value.
    pub fn set_defaults(&mut self, options: CookieDefaults) {
        self.defaults.merge(options);
        debug!(defaults = ?self.defaults, "Updated cookie defaults");
    }

    /// Renders the attribute suffix (`; expires=..; path=..`) for `record`.
    fn render_attributes(&self, record: &CookieRecord) -> Result<String> {
        let mut attributes = String::new();

        if let Some(expires) = record.expires.as_deref() {
            let at = parse_expires(expires)?;
            attributes.push_str(&format!("; expires={}", format_http_date(&at)));
        }
        if let Some(max_age) = record.max_age {
            if max_age < 0 {
                return Err(StashError::InvalidMaxAge(max_age));
            }
            attributes.push_str(&format!("; max-age={}", max_age));
        }
        if let Some(path) = record.path.as_deref().or(self.defaults.path.as_deref()) {
            attributes.push_str(&format!("; path={}", path));
        }
        if let Some(domain) = record.domain.as_deref().or(self.defaults.domain.as_deref()) {
            attributes.push_str(&format!("; domain={}", domain));
        }
        if let Some(same_site) = record.same_site.or(self.defaults.same_site) {
            attributes.push_str(&format!("; samesite={}", same_site.as_str()));
        }
        // Secure when either the record or the defaults ask for it.
        if record.secure.unwrap_or(false) || self.defaults.secure.unwrap_or(false) {
            attributes.push_str("; secure");
        }

        Ok(attributes)
    }

    // == Set One ==
    /// Writes a single cookie.
    ///
    /// Requires a non-empty key and value. `expires` must parse as a date and
    /// `max_age` must be non-negative. With `encrypt` set, the value is
    /// replaced by its ciphertext, which requires a secret key.
    pub fn set_one(&self, record: &CookieRecord) -> Result<()> {
        record.validate()?;
        let attributes = self.render_attributes(record)?;

        let value = if record.encrypt {
            let secret_key =
                usable_secret(record.secret_key.as_deref()).ok_or(StashError::MissingSecretKey)?;
            crypto::encrypt(&record.value, secret_key)?
        } else {
            record.value.clone()
        };

        let cookie = format!(
            "{}={}{}",
            encode_component(&record.key),
            encode_component(&value),
            attributes
        );
        self.jar.write(&cookie)?;

        debug!(key = %record.key, encrypted = record.encrypt, "Set cookie");
        Ok(())
    }

    // == Set Many ==
    /// Writes each record in order, stopping at the first failure.
    ///
    /// Returns false as soon as a record fails; later records are not written.
    pub fn set_many(&self, records: &[CookieRecord]) -> bool {
        for record in records {
            if let Err(err) = self.set_one(record) {
                warn!(key = %record.key, error = %err, "Cookie batch stopped at failing record");
                return false;
            }
        }
        true
    }

    // == Get One ==
    /// Returns the value of the first cookie named `key`.
    ///
    /// With a non-empty secret the value is decrypted, and a decryption
    /// failure is returned as an error.
    pub fn get_one(&self, key: &str, secret_key: Option<&str>) -> Result<Option<String>> {
        if key.is_empty() {
            return Err(StashError::MissingKey);
        }

        let header = self.jar.read()?;
        let Some(cookie) = parse_cookie_header(&header)
            .into_iter()
            .find(|cookie| cookie.decoded_name() == key)
        else {
            return Ok(None);
        };

        let value = cookie.decoded_value();
        match usable_secret(secret_key) {
            Some(secret_key) => Ok(Some(crypto::decrypt(&value, secret_key)?)),
            None => Ok(Some(value)),
        }
    }

    // == Get Many ==
    /// Returns the values of every cookie whose name is in `keys`.
    ///
    /// Results follow jar order, not the order of `keys`, and repeat when the
    /// jar holds several cookies of one name. Entries that fail to decrypt are
    /// logged and skipped.
    pub fn get_many<S: AsRef<str>>(
        &self,
        keys: &[S],
        secret_key: Option<&str>,
    ) -> Result<Vec<String>> {
        if keys.is_empty() {
            return Err(StashError::InvalidKeys("Key list is empty".to_string()));
        }
        if keys.iter().any(|key| key.as_ref().is_empty()) {
            return Err(StashError::InvalidKeys(
                "Key list contains an empty key".to_string(),
            ));
        }

        let wanted: HashSet<&str> = keys.iter().map(|key| key.as_ref()).collect();
        let secret_key = usable_secret(secret_key);
        let header = self.jar.read()?;

        let mut values = Vec::new();
        for cookie in parse_cookie_header(&header) {
            let name = cookie.decoded_name();
            if !wanted.contains(name.as_str()) {
                continue;
            }
            if let Some(value) = self.open_value(&name, &cookie.decoded_value(), secret_key) {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Decrypts `value` when a secret is given, logging and dropping failures.
    fn open_value(&self, name: &str, value: &str, secret_key: Option<&str>) -> Option<String> {
        match secret_key {
            Some(secret_key) => match crypto::decrypt(value, secret_key) {
                Ok(plaintext) => Some(plaintext),
                Err(err) => {
                    warn!(key = name, error = %err, "Skipping cookie that failed to decrypt");
                    None
                }
            },
            None => Some(value.to_string()),
        }
    }

    // == Remove One ==
    /// Expires the cookie named `key` at path `/`.
    ///
    /// Default domain, samesite and secure attributes still apply so the
    /// deletion targets the cookie the defaults created. Returns false on failure.
    pub fn remove_one(&self, key: &str) -> bool {
        if key.is_empty() {
            warn!("Cannot remove cookie with an empty key");
            return false;
        }

        let record = CookieRecord::new(key, "").expires(EPOCH_EXPIRES).path("/");
        let result = self.render_attributes(&record).and_then(|attributes| {
            self.jar
                .write(&format!("{}={}", encode_component(key), attributes))
        });

        match result {
            Ok(()) => {
                debug!(key, "Removed cookie");
                true
            }
            Err(err) => {
                warn!(key, error = %err, "Failed to remove cookie");
                false
            }
        }
    }

    // == Remove Many ==
    /// Removes every key, continuing past failures.
    ///
    /// Returns true only if every removal succeeded.
    pub fn remove_many<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        keys.iter()
            .fold(true, |all_removed, key| self.remove_one(key.as_ref()) && all_removed)
    }

    // == Clear All ==
    /// Expires every cookie currently in the jar at path `/`.
    ///
    /// Returns false if reading or writing the jar fails.
    pub fn clear_all(&self) -> bool {
        match self.try_clear_all() {
            Ok(cleared) => {
                debug!(cleared, "Cleared cookies");
                true
            }
            Err(err) => {
                warn!(error = %err, "Failed to clear cookies");
                false
            }
        }
    }

    fn try_clear_all(&self) -> Result<usize> {
        let header = self.jar.read()?;
        let cookies = parse_cookie_header(&header);
        for cookie in &cookies {
            self.jar.write(&format!(
                "{}=; expires={}; path=/",
                cookie.name, EPOCH_EXPIRES
            ))?;
        }
        Ok(cookies.len())
    }

    // == Has ==
    /// Returns true if a cookie named `key` exists.
    pub fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get_one(key, None)?.is_some())
    }

    // == All Keys ==
    /// Decoded names of every cookie in jar order, duplicates included.
    pub fn all_keys(&self) -> Result<Vec<String>> {
        let header = self.jar.read()?;
        Ok(parse_cookie_header(&header)
            .iter()
            .map(|cookie| cookie.decoded_name())
            .collect())
    }

    // == Get All As Map ==
    /// Decodes every cookie into a name to value map.
    ///
    /// A later cookie overwrites an earlier one of the same name. Entries that
    /// fail to decrypt are logged and left out.
    pub fn get_all_as_map(&self, secret_key: Option<&str>) -> Result<HashMap<String, String>> {
        let secret_key = usable_secret(secret_key);
        let header = self.jar.read()?;

        let mut values = HashMap::new();
        for cookie in parse_cookie_header(&header) {
            let name = cookie.decoded_name();
            if let Some(value) = self.open_value(&name, &cookie.decoded_value(), secret_key) {
                values.insert(name, value);
            }
        }
        Ok(values)
    }
}
