//! Reusable field filters
//!
//! These filters sanitize validated values right before they are sent to the
//! remote API. They never reject input: a value that cannot be made safe is
//! replaced, not reported.

use crate::core::field::is_http_url;
use regex::Regex;
use std::sync::OnceLock;

/// Filter: trim whitespace from a string
pub fn trim() -> impl Fn(&str) -> String + Send + Sync + Clone {
    |value: &str| value.trim().to_string()
}

/// Filter: remove `<`, `>` and ASCII control characters
pub fn strip_angle_brackets() -> impl Fn(&str) -> String + Send + Sync + Clone {
    |value: &str| {
        static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();
        let regex = UNSAFE_CHARS.get_or_init(|| Regex::new(r"[<>\x00-\x1F\x7F]").unwrap());
        regex.replace_all(value, "").into_owned()
    }
}

/// Filter: truncate to at most `max` characters
///
/// Counts `char`s, so multi-byte text is never cut mid-character.
pub fn truncate_chars(max: usize) -> impl Fn(&str) -> String + Send + Sync + Clone {
    move |value: &str| match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// Filter: keep an `http`/`https` URL, otherwise substitute an empty string
pub fn http_url_or_empty() -> impl Fn(&str) -> String + Send + Sync + Clone {
    |value: &str| {
        let value = value.trim();
        if is_http_url(value) {
            value.to_string()
        } else {
            String::new()
        }
    }
}

/// Filter: round a number to the given decimal places
pub fn round_decimals(decimals: u32) -> impl Fn(f64) -> f64 + Send + Sync + Clone {
    move |value: f64| {
        let factor = 10_f64.powi(decimals as i32);
        (value * factor).round() / factor
    }
}

/// Free-text pipeline: trim, strip unsafe characters, truncate
pub fn sanitize_text(value: &str, max_len: usize) -> String {
    let stripped = strip_angle_brackets()(&trim()(value));
    truncate_chars(max_len)(stripped.trim())
}

/// URL pipeline: truncate, then require an http(s) scheme
pub fn sanitize_url(value: &str, max_len: usize) -> String {
    let truncated = truncate_chars(max_len)(value.trim());
    http_url_or_empty()(&truncated)
}
