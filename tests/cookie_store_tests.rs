//! Integration Tests for the Cookie Store
//!
//! Drives the public API over the in-memory cookie jar.

use std::cell::Cell;
use std::rc::Rc;

use browser_stash::{
    CookieDefaults, CookieJar, CookieRecord, CookieStore, ManualClock, MemoryCookieJar, Result,
    SameSite, StashError,
};

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn create_test_store() -> CookieStore<MemoryCookieJar> {
    init_tracing();
    CookieStore::in_memory()
}

/// Jar whose writes start failing after a number of successes.
struct FailingJar {
    inner: MemoryCookieJar,
    writes_left: Cell<usize>,
}

impl CookieJar for FailingJar {
    fn read(&self) -> Result<String> {
        self.inner.read()
    }

    fn write(&self, cookie: &str) -> Result<()> {
        if self.writes_left.get() == 0 {
            return Err(StashError::Storage("cookie jar is read-only".to_string()));
        }
        self.writes_left.set(self.writes_left.get() - 1);
        self.inner.write(cookie)
    }
}

/// Jar with a fixed header, for duplicate and foreign entries.
struct FixedJar(&'static str);

impl CookieJar for FixedJar {
    fn read(&self) -> Result<String> {
        Ok(self.0.to_string())
    }

    fn write(&self, _cookie: &str) -> Result<()> {
        Ok(())
    }
}

// == Set ==

#[test]
fn test_defaults_scenario() {
    let mut store = create_test_store();

    store.set_defaults(CookieDefaults::new().domain("example.com"));
    store.set_one(&CookieRecord::new("a", "1")).unwrap();

    let written = store.jar().last_written().unwrap();
    assert!(written.contains("domain=example.com"), "got {}", written);
}

#[test]
fn test_set_many_stops_at_first_failure() {
    let store = create_test_store();
    let records = vec![
        CookieRecord::new("first", "1"),
        CookieRecord::new("second", "2").max_age(-10),
        CookieRecord::new("third", "3"),
    ];

    assert!(!store.set_many(&records));
    assert!(store.has("first").unwrap());
    assert!(!store.has("second").unwrap());
    assert!(!store.has("third").unwrap());
    assert_eq!(store.jar().written().len(), 1);
}

#[test]
fn test_set_many_all_valid() {
    let store = create_test_store();
    let records = vec![
        CookieRecord::new("a", "1"),
        CookieRecord::new("b", "2").same_site(SameSite::Lax),
    ];

    assert!(store.set_many(&records));
    assert_eq!(store.all_keys().unwrap(), vec!["a", "b"]);
}

#[test]
fn test_records_from_json() {
    let store = create_test_store();
    let records: Vec<CookieRecord> = serde_json::from_str(
        r#"[{"key": "lang", "value": "en", "path": "/"},
            {"key": "token", "value": "t0k", "encrypt": true, "secretKey": "s"}]"#,
    )
    .unwrap();

    assert!(store.set_many(&records));
    assert_eq!(store.get_one("lang", None).unwrap().as_deref(), Some("en"));
    assert_eq!(store.get_one("token", Some("s")).unwrap().as_deref(), Some("t0k"));
}

#[test]
fn test_expires_attribute_honored_by_jar() {
    init_tracing();
    let clock = Rc::new(ManualClock::new(0));
    let store = CookieStore::new(MemoryCookieJar::new().with_clock(clock.clone()));

    store
        .set_one(&CookieRecord::new("promo", "yes").expires("1970-01-01T00:01:00Z"))
        .unwrap();
    assert!(store.has("promo").unwrap());

    clock.set(60_000);
    assert!(!store.has("promo").unwrap());
}

// == Get ==

#[test]
fn test_get_many_follows_jar_order() {
    let store = create_test_store();
    for (key, value) in [("a", "1"), ("b", "2"), ("c", "3")] {
        store.set_one(&CookieRecord::new(key, value)).unwrap();
    }

    let values = store.get_many(&["c", "a", "missing"], None).unwrap();
    assert_eq!(values, vec!["1", "3"]);
}

#[test]
fn test_get_many_skips_undecryptable() {
    let store = create_test_store();
    store
        .set_one(&CookieRecord::new("enc", "hidden").encrypted("k"))
        .unwrap();
    store.set_one(&CookieRecord::new("plain", "open")).unwrap();

    let values = store.get_many(&["enc", "plain"], Some("k")).unwrap();
    assert_eq!(values, vec!["hidden"]);
}

#[test]
fn test_get_many_keeps_duplicates() {
    init_tracing();
    let store = CookieStore::new(FixedJar("a=1; b=2; a=3"));
    assert_eq!(store.get_many(&["a"], None).unwrap(), vec!["1", "3"]);
    assert_eq!(store.get_one("a", None).unwrap().as_deref(), Some("1"));
    assert_eq!(store.all_keys().unwrap(), vec!["a", "b", "a"]);
}

#[test]
fn test_get_all_as_map_last_duplicate_wins() {
    init_tracing();
    let store = CookieStore::new(FixedJar("a=1; b=x%20y; a=3"));
    let map = store.get_all_as_map(None).unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map["a"], "3");
    assert_eq!(map["b"], "x y");
}

#[test]
fn test_get_all_as_map_skips_decrypt_failures() {
    let store = create_test_store();
    store
        .set_one(&CookieRecord::new("enc", "hidden").encrypted("k"))
        .unwrap();
    store.set_one(&CookieRecord::new("plain", "open")).unwrap();

    let map = store.get_all_as_map(Some("k")).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map["enc"], "hidden");
}

#[test]
fn test_get_one_raises_on_decrypt_failure() {
    let store = create_test_store();
    store
        .set_one(&CookieRecord::new("enc", "hidden").encrypted("right"))
        .unwrap();

    let result = store.get_one("enc", Some("wrong"));
    assert!(matches!(result, Err(StashError::DecryptionFailed(_))));
}

#[test]
fn test_has_requires_key() {
    let store = create_test_store();
    assert!(matches!(store.has(""), Err(StashError::MissingKey)));
    assert!(!store.has("nothing").unwrap());
}

// == Remove ==

#[test]
fn test_remove_one_write_failure_returns_false() {
    init_tracing();
    let store = CookieStore::new(FailingJar {
        inner: MemoryCookieJar::new(),
        writes_left: Cell::new(1),
    });
    store.set_one(&CookieRecord::new("a", "1")).unwrap();

    assert!(!store.remove_one("a"));
    assert!(store.has("a").unwrap());
}

#[test]
fn test_remove_many_continues_past_failures() {
    init_tracing();
    let store = CookieStore::new(FailingJar {
        inner: MemoryCookieJar::new(),
        writes_left: Cell::new(3),
    });
    store.set_one(&CookieRecord::new("a", "1")).unwrap();
    store.set_one(&CookieRecord::new("b", "2")).unwrap();

    // Only one write remains: "a" is removed, "b" fails.
    assert!(!store.remove_many(&["a", "b"]));
    assert!(!store.has("a").unwrap());
    assert!(store.has("b").unwrap());
}

#[test]
fn test_clear_all() {
    let store = create_test_store();
    store.set_one(&CookieRecord::new("a", "1")).unwrap();
    store.set_one(&CookieRecord::new("b c", "2").path("/")).unwrap();

    assert!(store.clear_all());
    assert!(store.all_keys().unwrap().is_empty());
    assert!(store
        .jar()
        .written()
        .iter()
        .any(|cookie| cookie == "b%20c=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/"));
}

#[test]
fn test_clear_all_failure_returns_false() {
    init_tracing();
    let store = CookieStore::new(FailingJar {
        inner: MemoryCookieJar::new(),
        writes_left: Cell::new(1),
    });
    store.set_one(&CookieRecord::new("a", "1")).unwrap();

    assert!(!store.clear_all());
}
