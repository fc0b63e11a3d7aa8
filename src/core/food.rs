//! Catalog entry types: the normalized record and the form that edits it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest rating a record can carry
pub const MIN_RATING: f64 = 1.0;

/// Highest rating a record can carry
pub const MAX_RATING: f64 = 5.0;

/// Decimal places a price is stored with
pub const PRICE_DECIMALS: u32 = 2;

/// Opening status of a restaurant
///
/// The remote API spells these `"Open Now"` and `"Closed"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RestaurantStatus {
    #[serde(rename = "Open Now")]
    OpenNow,
    #[default]
    #[serde(rename = "Closed")]
    Closed,
}

impl RestaurantStatus {
    /// Wire spelling of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            RestaurantStatus::OpenNow => "Open Now",
            RestaurantStatus::Closed => "Closed",
        }
    }

    /// Strict parse used on the write path (exact wire spelling only)
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "Open Now" => Some(RestaurantStatus::OpenNow),
            "Closed" => Some(RestaurantStatus::Closed),
            _ => None,
        }
    }

    /// Lenient parse used on the read path
    ///
    /// Unknown values fail closed.
    pub fn from_remote(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("open now") {
            RestaurantStatus::OpenNow
        } else {
            RestaurantStatus::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, RestaurantStatus::OpenNow)
    }
}

impl fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestaurantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| format!("unknown restaurant status '{}'", s))
    }
}

/// Restaurant embedded in every catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Restaurant {
    pub name: String,
    pub logo: String,
    pub status: RestaurantStatus,
}

/// Normalized catalog entry
///
/// Produced by [`crate::core::adapter::normalize_food`] from whatever shape the
/// remote API returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    pub id: String,
    pub name: String,
    pub rating: f64,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub restaurant: Restaurant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FoodRecord {
    /// Price as shown on a card, e.g. `$8.99`
    pub fn display_price(&self) -> Option<String> {
        self.price.map(|p| format!("${:.2}", p))
    }

    /// Rating as shown on a card, e.g. `4.5`
    pub fn display_rating(&self) -> String {
        format!("{:.1}", self.rating)
    }
}

/// A numeric form input: either a JSON number or the raw text of an input box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    /// Numeric value, if the input holds one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FormNumber::Number(n) if n.is_finite() => Some(*n),
            FormNumber::Number(_) => None,
            FormNumber::Text(s) => crate::core::field::parse_number(s),
        }
    }

    /// Whether the input is empty text
    pub fn is_blank(&self) -> bool {
        matches!(self, FormNumber::Text(s) if s.trim().is_empty())
    }
}

impl From<f64> for FormNumber {
    fn from(value: f64) -> Self {
        FormNumber::Number(value)
    }
}

impl From<&str> for FormNumber {
    fn from(value: &str) -> Self {
        FormNumber::Text(value.to_string())
    }
}

/// Data entered in the add/edit meal form
///
/// Every field is optional so that a half-filled form can be validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FoodFormData {
    pub food_name: Option<String>,
    pub food_rating: Option<FormNumber>,
    pub food_image: Option<String>,
    pub food_price: Option<FormNumber>,
    pub restaurant_name: Option<String>,
    pub restaurant_logo: Option<String>,
    pub restaurant_status: Option<String>,
}

impl FoodFormData {
    /// An empty "Add a meal" form
    pub fn blank() -> Self {
        Self {
            food_name: Some(String::new()),
            food_rating: Some(FormNumber::Text(String::new())),
            food_image: Some(String::new()),
            food_price: Some(FormNumber::Text(String::new())),
            restaurant_name: Some(String::new()),
            restaurant_logo: Some(String::new()),
            restaurant_status: Some(RestaurantStatus::OpenNow.as_str().to_string()),
        }
    }

    /// An "Edit meal" form prefilled from an existing record
    pub fn from_record(record: &FoodRecord) -> Self {
        Self {
            food_name: Some(record.name.clone()),
            food_rating: Some(FormNumber::Text(record.rating.to_string())),
            food_image: Some(record.image.clone()),
            food_price: Some(FormNumber::Text(
                record.price.map(|p| p.to_string()).unwrap_or_default(),
            )),
            restaurant_name: Some(record.restaurant.name.clone()),
            restaurant_logo: Some(record.restaurant.logo.clone()),
            restaurant_status: Some(record.restaurant.status.as_str().to_string()),
        }
    }
}

/// Form data that passed validation
///
/// Strings are trimmed and numbers parsed. This is the only input accepted by
/// [`crate::remote::FoodPayload::from_valid`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidFood {
    pub name: String,
    pub rating: f64,
    pub image: String,
    pub price: f64,
    pub restaurant_name: String,
    pub restaurant_logo: String,
    pub restaurant_status: RestaurantStatus,
}

impl ValidFood {
    /// Apply the pending values to a cached record, keeping its identity
    pub fn apply_to(&self, record: &FoodRecord) -> FoodRecord {
        FoodRecord {
            id: record.id.clone(),
            name: self.name.clone(),
            rating: self.rating,
            image: self.image.clone(),
            price: Some(self.price),
            restaurant: Restaurant {
                name: self.restaurant_name.clone(),
                logo: self.restaurant_logo.clone(),
                status: self.restaurant_status,
            },
            created_at: record.created_at,
        }
    }
}
