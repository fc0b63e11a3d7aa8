//! Implementations of [`crate::core::FoodApi`] and the wire body they send

pub mod http;
pub mod in_memory;
pub mod payload;

pub use http::HttpFoodApi;
pub use in_memory::InMemoryFoodApi;
pub use payload::{FoodPayload, sanitize_food};
