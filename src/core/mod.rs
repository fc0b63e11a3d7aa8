//! Core module containing the catalog model, validation and data-access traits

pub mod adapter;
pub mod cancel;
pub mod error;
pub mod events;
pub mod field;
pub mod food;
pub mod query;
pub mod service;
pub mod validation;

pub use adapter::{normalize_food, normalize_list};
pub use cancel::CancelToken;
pub use error::{Action, FoodError, FoodResult, NormalizationError};
pub use events::{CacheEvent, EventBus, EventEnvelope};
pub use food::{FoodFormData, FoodRecord, FormNumber, Restaurant, RestaurantStatus, ValidFood};
pub use query::{SearchQuery, filter_foods};
pub use service::{FoodApi, search};
pub use validation::{FormField, ValidationErrors, validate_food_form};
