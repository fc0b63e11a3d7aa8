//! Remote schema adapter
//!
//! The mock API has accumulated two record shapes. Older records are flat:
//!
//! ```json
//! {"id": "1", "name": "Beef Burger", "rating": "4.5", "Price": "8.99",
//!  "restaurantName": "Burger Palace", "logo": "...", "status": "Open Now"}
//! ```
//!
//! Newer ones nest the restaurant:
//!
//! ```json
//! {"id": "2", "name": "Salad", "rating": 4.2,
//!  "restaurant": {"name": "Fresh & Green", "logo": "...", "status": "Closed"}}
//! ```
//!
//! Resolution order for restaurant fields is flat first, then nested. A flat
//! field holding an empty string counts as absent.

use crate::core::error::NormalizationError;
use crate::core::field::{coerce_number, coerce_text, non_blank_text};
use crate::core::food::{FoodRecord, MAX_RATING, MIN_RATING, Restaurant, RestaurantStatus};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Normalize one remote record
///
/// Fails only when the record is not an object or lacks `id` or `name`.
pub fn normalize_food(value: &Value) -> Result<FoodRecord, NormalizationError> {
    let obj = value.as_object().ok_or(NormalizationError::NotAnObject)?;

    let id = obj
        .get("id")
        .and_then(non_blank_text)
        .ok_or(NormalizationError::MissingField { field: "id" })?;
    let name = obj
        .get("name")
        .and_then(non_blank_text)
        .ok_or(NormalizationError::MissingField { field: "name" })?;

    let rating = obj
        .get("rating")
        .and_then(coerce_number)
        .map(|r| r.clamp(MIN_RATING, MAX_RATING))
        .unwrap_or(MIN_RATING);

    let price = obj
        .get("Price")
        .and_then(coerce_number)
        .or_else(|| obj.get("price").and_then(coerce_number));

    let image = obj.get("image").and_then(coerce_text).unwrap_or_default();

    let nested = obj.get("restaurant").and_then(Value::as_object);
    let restaurant = Restaurant {
        name: flat_or_nested(obj, "restaurantName", nested, "name").unwrap_or_default(),
        logo: flat_or_nested(obj, "logo", nested, "logo").unwrap_or_default(),
        status: flat_or_nested(obj, "status", nested, "status")
            .map(|s| RestaurantStatus::from_remote(&s))
            .unwrap_or(RestaurantStatus::Closed),
    };

    let created_at = obj
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(FoodRecord {
        id,
        name,
        rating,
        image,
        price,
        restaurant,
        created_at,
    })
}

/// Normalize a list response, skipping records that cannot be normalized
///
/// Remote order is preserved.
pub fn normalize_list(values: Vec<Value>) -> Vec<FoodRecord> {
    let total = values.len();
    let foods: Vec<FoodRecord> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match normalize_food(value) {
            Ok(food) => Some(food),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed remote food record");
                None
            }
        })
        .collect();

    if foods.len() < total {
        tracing::debug!(kept = foods.len(), total, "normalized food list with skips");
    }
    foods
}

fn flat_or_nested(
    obj: &Map<String, Value>,
    flat_key: &str,
    nested: Option<&Map<String, Value>>,
    nested_key: &str,
) -> Option<String> {
    obj.get(flat_key)
        .and_then(non_blank_text)
        .or_else(|| nested.and_then(|n| n.get(nested_key)).and_then(non_blank_text))
}
