//! Reusable field validators
//!
//! Each factory returns a rule for one form input. A rule yields the typed,
//! trimmed value on success or the message shown next to the input.

use crate::core::field::is_absolute_url;
use crate::core::food::{FormNumber, RestaurantStatus};
use crate::core::validation::filters;

/// Validator: text must be present and non-blank
pub fn required_text(
    label: &'static str,
) -> impl Fn(Option<&str>) -> Result<String, String> + Send + Sync + Clone {
    move |value: Option<&str>| match value.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(format!("{} is required", label)),
    }
}

/// Validator: text must be non-blank once markup characters are stripped
///
/// Checks the value the remote will actually receive.
pub fn sanitized_text(
    label: &'static str,
) -> impl Fn(Option<&str>) -> Result<String, String> + Send + Sync + Clone {
    let strip = filters::strip_angle_brackets();
    let required = required_text(label);
    move |value: Option<&str>| required(value.map(|v| strip(v)).as_deref())
}

/// Validator: text must be present and parse as an absolute URL
pub fn absolute_url(
    label: &'static str,
) -> impl Fn(Option<&str>) -> Result<String, String> + Send + Sync + Clone {
    let required = required_text(label);
    move |value: Option<&str>| {
        let url = required(value)?;
        if is_absolute_url(&url) {
            Ok(url)
        } else {
            Err(format!("{} must be a valid URL", label))
        }
    }
}

/// Validator: number must be present and numeric
pub fn number(
    label: &'static str,
) -> impl Fn(Option<&FormNumber>) -> Result<f64, String> + Send + Sync + Clone {
    move |value: Option<&FormNumber>| match value {
        None => Err(format!("{} is required", label)),
        Some(n) if n.is_blank() => Err(format!("{} is required", label)),
        Some(n) => n
            .as_f64()
            .ok_or_else(|| format!("{} must be a number", label)),
    }
}

/// Validator: number must be within `[min, max]`
pub fn number_in_range(
    label: &'static str,
    min: f64,
    max: f64,
) -> impl Fn(Option<&FormNumber>) -> Result<f64, String> + Send + Sync + Clone {
    let numeric = number(label);
    move |value: Option<&FormNumber>| {
        let n = numeric(value)?;
        if n < min || n > max {
            Err(format!("{} must be between {} and {}", label, min, max))
        } else {
            Ok(n)
        }
    }
}

/// Validator: number must be strictly positive
pub fn positive_number(
    label: &'static str,
) -> impl Fn(Option<&FormNumber>) -> Result<f64, String> + Send + Sync + Clone {
    let numeric = number(label);
    move |value: Option<&FormNumber>| {
        let n = numeric(value)?;
        if n <= 0.0 {
            Err(format!("{} must be a positive number", label))
        } else {
            Ok(n)
        }
    }
}

/// Validator: amount must stay strictly positive after rounding to `decimals`
///
/// Yields the rounded amount.
pub fn positive_amount(
    label: &'static str,
    decimals: u32,
) -> impl Fn(Option<&FormNumber>) -> Result<f64, String> + Send + Sync + Clone {
    let positive = positive_number(label);
    let round = filters::round_decimals(decimals);
    move |value: Option<&FormNumber>| {
        let n = round(positive(value)?);
        if n <= 0.0 {
            Err(format!("{} must be a positive number", label))
        } else {
            Ok(n)
        }
    }
}

/// Validator: value must be one of the restaurant statuses
pub fn restaurant_status(
    label: &'static str,
) -> impl Fn(Option<&str>) -> Result<RestaurantStatus, String> + Send + Sync + Clone {
    move |value: Option<&str>| {
        value.and_then(RestaurantStatus::from_wire).ok_or_else(|| {
            format!(
                "{} must be '{}' or '{}'",
                label,
                RestaurantStatus::OpenNow,
                RestaurantStatus::Closed
            )
        })
    }
}
