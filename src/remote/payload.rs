//! Request body sent on create and update

use crate::config::ClientConfig;
use crate::core::food::{PRICE_DECIMALS, RestaurantStatus, ValidFood};
use crate::core::validation::filters::{round_decimals, sanitize_text, sanitize_url};
use serde::{Deserialize, Serialize};

/// Body of `POST /Food` and `PUT /Food/{id}`
///
/// The remote expects the flat legacy shape with a capitalized `Price` string:
///
/// ```json
/// {"name": "Beef Burger", "rating": 4.5, "image": "https://...",
///  "Price": "8.99", "restaurantName": "Burger Palace",
///  "logo": "https://...", "status": "Open Now"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodPayload {
    pub name: String,
    pub rating: f64,
    pub image: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "restaurantName")]
    pub restaurant_name: String,
    pub logo: String,
    pub status: RestaurantStatus,
}

impl FoodPayload {
    /// Build the wire body from validated form data
    ///
    /// Values are sanitized with the limits of `config` (see [`sanitize_food`]).
    pub fn from_valid(valid: &ValidFood, config: &ClientConfig) -> Self {
        let clean = sanitize_food(valid, config);
        Self {
            name: clean.name,
            rating: clean.rating,
            image: clean.image,
            price: format!("{:.2}", clean.price),
            restaurant_name: clean.restaurant_name,
            logo: clean.restaurant_logo,
            status: clean.restaurant_status,
        }
    }
}

/// Sanitize validated values right before transmission
///
/// Text loses `<`, `>` and control characters and is truncated; URLs are
/// truncated and blanked unless they are http(s); the price is rounded to
/// cents. Idempotent.
pub fn sanitize_food(valid: &ValidFood, config: &ClientConfig) -> ValidFood {
    ValidFood {
        name: sanitize_text(&valid.name, config.max_text_length),
        rating: valid.rating,
        image: sanitize_url(&valid.image, config.max_url_length),
        price: round_decimals(PRICE_DECIMALS)(valid.price),
        restaurant_name: sanitize_text(&valid.restaurant_name, config.max_text_length),
        restaurant_logo: sanitize_url(&valid.restaurant_logo, config.max_url_length),
        restaurant_status: valid.restaurant_status,
    }
}
