//! Cookie Jar Module
//!
//! The port through which the cookie facade reads and writes the ambient
//! cookie jar, plus an in-memory emulation of `document.cookie`.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::DateTime;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;

/// Access to a cookie jar shaped like `document.cookie`.
pub trait CookieJar {
    /// Returns every visible cookie as `name=value` pairs joined by `"; "`.
    fn read(&self) -> Result<String>;

    /// Applies one cookie string (`name=value; attr=...`) to the jar.
    fn write(&self, cookie: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
struct StoredCookie {
    name: String,
    value: String,
    path: String,
    domain: Option<String>,
    /// Unix milliseconds; `None` for session cookies
    expires_at: Option<i64>,
}

impl StoredCookie {
    fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now_ms)
    }

    fn same_identity(&self, other: &StoredCookie) -> bool {
        self.name == other.name && self.path == other.path && self.domain == other.domain
    }
}

#[derive(Debug, Default)]
struct JarState {
    cookies: Vec<StoredCookie>,
    written: Vec<String>,
}

// == Memory Cookie Jar ==
/// In-memory `CookieJar` with `document.cookie` assignment semantics.
///
/// A cookie is identified by name, path and domain. `max-age` wins over
/// `expires`, and a cookie whose expiry is not in the future is deleted.
/// Every path and domain is treated as visible on read. Clones share state.
#[derive(Clone)]
pub struct MemoryCookieJar {
    state: Rc<RefCell<JarState>>,
    clock: Rc<dyn Clock>,
}

impl Default for MemoryCookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCookieJar {
    /// Creates an empty jar on the system clock.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(JarState::default())),
            clock: Rc::new(SystemClock),
        }
    }

    /// Replaces the time source used for expiry.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Every cookie string written so far, oldest first.
    pub fn written(&self) -> Vec<String> {
        self.state.borrow().written.clone()
    }

    /// The most recent cookie string written.
    pub fn last_written(&self) -> Option<String> {
        self.state.borrow().written.last().cloned()
    }

    /// Number of live cookies.
    pub fn len(&self) -> usize {
        let now = self.clock.now_ms();
        self.state
            .borrow()
            .cookies
            .iter()
            .filter(|cookie| !cookie.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn parse(&self, cookie: &str) -> StoredCookie {
        let mut segments = cookie.split(';');
        let pair = segments.next().unwrap_or_default().trim();
        let (name, value) = pair.split_once('=').unwrap_or(("", pair));

        let mut path = "/".to_string();
        let mut domain = None;
        let mut expires_at = None;
        let mut max_age = None;

        for attribute in segments {
            let attribute = attribute.trim();
            let (attr, attr_value) = attribute.split_once('=').unwrap_or((attribute, ""));
            let attr_value = attr_value.trim();
            match attr.trim().to_ascii_lowercase().as_str() {
                "expires" => {
                    if let Ok(at) = DateTime::parse_from_rfc2822(attr_value) {
                        expires_at = Some(at.timestamp_millis());
                    }
                }
                "max-age" => {
                    if let Ok(seconds) = attr_value.parse::<i64>() {
                        max_age = Some(seconds);
                    }
                }
                "path" if attr_value.starts_with('/') => path = attr_value.to_string(),
                "domain" if !attr_value.is_empty() => {
                    domain = Some(attr_value.trim_start_matches('.').to_ascii_lowercase());
                }
                _ => {}
            }
        }

        if let Some(seconds) = max_age {
            expires_at = Some(
                self.clock
                    .now_ms()
                    .saturating_add(seconds.saturating_mul(1000)),
            );
        }

        StoredCookie {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
            path,
            domain,
            expires_at,
        }
    }
}

impl CookieJar for MemoryCookieJar {
    fn read(&self) -> Result<String> {
        let now = self.clock.now_ms();
        let state = self.state.borrow();
        let pairs: Vec<String> = state
            .cookies
            .iter()
            .filter(|cookie| !cookie.is_expired(now))
            .map(|cookie| {
                if cookie.name.is_empty() {
                    cookie.value.clone()
                } else {
                    format!("{}={}", cookie.name, cookie.value)
                }
            })
            .collect();
        Ok(pairs.join("; "))
    }

    fn write(&self, cookie: &str) -> Result<()> {
        let incoming = self.parse(cookie);
        let expired = incoming.is_expired(self.clock.now_ms());

        let mut state = self.state.borrow_mut();
        state.written.push(cookie.to_string());

        let existing = state
            .cookies
            .iter()
            .position(|stored| stored.same_identity(&incoming));
        match (existing, expired) {
            (Some(index), true) => {
                state.cookies.remove(index);
            }
            (Some(index), false) => state.cookies[index] = incoming,
            (None, false) => state.cookies.push(incoming),
            (None, true) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_write_and_read() {
        let jar = MemoryCookieJar::new();
        jar.write("a=1").unwrap();
        jar.write("b=2; path=/").unwrap();

        assert_eq!(jar.read().unwrap(), "a=1; b=2");
        assert_eq!(jar.len(), 2);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let jar = MemoryCookieJar::new();
        jar.write("a=1").unwrap();
        jar.write("b=2").unwrap();
        jar.write("a=3").unwrap();

        assert_eq!(jar.read().unwrap(), "a=3; b=2");
    }

    #[test]
    fn test_identity_includes_path_and_domain() {
        let jar = MemoryCookieJar::new();
        jar.write("a=1; path=/").unwrap();
        jar.write("a=2; path=/app").unwrap();
        jar.write("a=3; domain=.Example.com").unwrap();

        assert_eq!(jar.read().unwrap(), "a=1; a=2; a=3");
    }

    #[test]
    fn test_past_expiry_deletes() {
        let jar = MemoryCookieJar::new();
        jar.write("a=1").unwrap();
        jar.write("a=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/")
            .unwrap();

        assert_eq!(jar.read().unwrap(), "");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_max_age_expires_with_clock() {
        let clock = Rc::new(ManualClock::new(0));
        let jar = MemoryCookieJar::new().with_clock(clock.clone());
        jar.write("a=1; max-age=10").unwrap();

        clock.set(9_999);
        assert_eq!(jar.read().unwrap(), "a=1");

        clock.set(10_000);
        assert_eq!(jar.read().unwrap(), "");
    }

    #[test]
    fn test_max_age_zero_deletes() {
        let jar = MemoryCookieJar::new();
        jar.write("a=1").unwrap();
        jar.write("a=1; max-age=0").unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_max_age_overrides_expires() {
        let clock = Rc::new(ManualClock::new(0));
        let jar = MemoryCookieJar::new().with_clock(clock.clone());
        jar.write("a=1; expires=Thu, 01 Jan 1970 00:00:00 GMT; max-age=60")
            .unwrap();
        assert_eq!(jar.read().unwrap(), "a=1");
    }

    #[test]
    fn test_written_log() {
        let jar = MemoryCookieJar::new();
        jar.write("a=1; secure").unwrap();
        jar.write("b=2").unwrap();

        assert_eq!(jar.written(), vec!["a=1; secure", "b=2"]);
        assert_eq!(jar.last_written().as_deref(), Some("b=2"));
    }
}
