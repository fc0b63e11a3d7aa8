//! Loosely-typed field helpers
//!
//! The remote API and form inputs both carry values whose JSON type is not
//! reliable: numbers arrive as strings, ids as numbers, blanks as `""`.
//! These helpers turn such values into typed Rust values or `None`.

use reqwest::Url;
use serde_json::Value;

/// Parse a base-10 floating point number from text
///
/// Surrounding whitespace is ignored. Non-finite results (`inf`, `NaN`) count
/// as unparseable.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a JSON value to a number
///
/// Numbers are taken as-is, strings are parsed, anything else is absent.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Coerce a JSON value to text
///
/// Strings are returned verbatim, numbers rendered in decimal. Null, booleans,
/// arrays and objects are absent.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`coerce_text`] but treats blank strings as absent
pub fn non_blank_text(value: &Value) -> Option<String> {
    coerce_text(value).filter(|s| !s.trim().is_empty())
}

/// Whether the string parses as an absolute URL (any scheme)
pub fn is_absolute_url(url: &str) -> bool {
    Url::parse(url.trim()).is_ok()
}

/// Whether the string parses as an absolute `http` or `https` URL
pub fn is_http_url(url: &str) -> bool {
    Url::parse(url.trim())
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
