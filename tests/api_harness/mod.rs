//! Shared test harness for `FoodApi` implementations
//!
//! Provides payload builders, the `food_api_tests!` contract suite and an
//! axum server that mimics the mock REST API.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod api_harness;
//! use api_harness::*;
//! ```

#![allow(dead_code)]

pub mod food_api_tests;
pub mod mock_server;

use foodwagen::prelude::*;

pub use mock_server::MockApi;

pub const FOOD_IMAGE: &str = "https://example.com/food.jpg";
pub const RESTAURANT_LOGO: &str = "https://example.com/logo.jpg";

/// A payload as the form layer would build it
pub fn test_payload(name: &str, restaurant: &str) -> FoodPayload {
    FoodPayload {
        name: name.to_string(),
        rating: 4.5,
        image: FOOD_IMAGE.to_string(),
        price: "8.99".to_string(),
        restaurant_name: restaurant.to_string(),
        logo: RESTAURANT_LOGO.to_string(),
        status: RestaurantStatus::OpenNow,
    }
}

/// A complete, valid meal form
pub fn valid_form(name: &str, restaurant: &str) -> FoodFormData {
    FoodFormData {
        food_name: Some(name.to_string()),
        food_rating: Some(FormNumber::from(4.5)),
        food_image: Some(FOOD_IMAGE.to_string()),
        food_price: Some(FormNumber::from("8.99")),
        restaurant_name: Some(restaurant.to_string()),
        restaurant_logo: Some(RESTAURANT_LOGO.to_string()),
        restaurant_status: Some("Open Now".to_string()),
    }
}

/// Client configuration pointing at a local mock server
pub fn local_config(addr: std::net::SocketAddr) -> ClientConfig {
    ClientConfig {
        base_url: format!("http://{}", addr),
        ..ClientConfig::default()
    }
}
