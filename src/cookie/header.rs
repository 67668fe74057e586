//! Cookie header helpers
//!
//! Percent-encoding, expiry date handling and parsing of the composite
//! `document.cookie` string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Result, StashError};

/// Expiry written to delete a cookie.
pub const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Characters left as-is by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Decodes a percent-encoded component; invalid UTF-8 is replaced.
pub fn decode_component(encoded: &str) -> String {
    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

// == Expiry Dates ==
/// Parses an `expires` value.
///
/// Accepts RFC 3339, RFC 2822 (including the `GMT` form cookies use),
/// `YYYY-MM-DDTHH:MM:SS[.fff]` and `YYYY-MM-DD`; the last two are read as UTC.
pub fn parse_expires(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(at.and_utc());
    }
    if let Some(at) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(at.and_utc());
    }

    Err(StashError::InvalidExpiry(format!(
        "'{}' is not a valid date",
        raw
    )))
}

/// Formats a timestamp the way cookie `expires` attributes expect.
pub fn format_http_date(at: &DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

// == Cookie Header Parsing ==
/// One `name=value` pair from the cookie header, still encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCookie<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl RawCookie<'_> {
    pub fn decoded_name(&self) -> String {
        decode_component(self.name)
    }

    pub fn decoded_value(&self) -> String {
        decode_component(self.value)
    }
}

/// Splits a `document.cookie` string into pairs, in jar order.
///
/// Empty segments are skipped; a segment without `=` is a nameless value.
pub fn parse_cookie_header(header: &str) -> Vec<RawCookie<'_>> {
    header
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((name, value)) => RawCookie {
                name: name.trim(),
                value: value.trim(),
            },
            None => RawCookie {
                name: "",
                value: segment,
            },
        })
        .collect()
}
