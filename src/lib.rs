//! # FoodWagen
//!
//! Client data layer for the FoodWagen food catalog: a typed model over a
//! loosely-shaped mock REST API, with form validation and a query cache.
//!
//! ## Features
//!
//! - **Schema Adapter**: Normalizes flat legacy and nested remote records into one [`FoodRecord`](core::FoodRecord)
//! - **Form Validation**: All seven meal-form fields checked in one pass, errors keyed by field
//! - **Sanitization**: Text and URLs cleaned and bounded before they leave the client
//! - **Pluggable Backend**: [`FoodApi`](core::FoodApi) trait with HTTP and in-memory implementations
//! - **Query Cache**: Stale-time caching, request dedup, invalidate-on-mutation, optimistic updates with rollback
//! - **Cancellation**: Every request can be dropped through a [`CancelToken`](core::CancelToken)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use foodwagen::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::default().apply_env()?;
//! let api = Arc::new(HttpFoodApi::new(config.clone())?);
//! let cache = FoodCache::new(api, config);
//! let cancel = CancelToken::new();
//!
//! for food in cache.search("pizza", &cancel).await? {
//!     println!("{} at {}", food.name, food.restaurant.name);
//! }
//!
//! match cache.submit(&form, None, &cancel).await {
//!     Ok(outcome) => println!("{}", outcome.notice()),
//!     Err(SubmitError::Invalid(errors)) => show_field_errors(&errors),
//!     Err(e) => println!("{}", e.user_message()),
//! }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod remote;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Action, CacheEvent, CancelToken, EventBus, EventEnvelope, FoodApi, FoodError,
        FoodFormData, FoodRecord, FoodResult, FormField, FormNumber, NormalizationError,
        Restaurant, RestaurantStatus, SearchQuery, ValidFood, ValidationErrors, filter_foods,
        normalize_food, normalize_list, search, validate_food_form,
    };

    // === Remote ===
    pub use crate::remote::{FoodPayload, HttpFoodApi, InMemoryFoodApi};

    // === Cache ===
    pub use crate::cache::{FoodCache, SubmitError, SubmitOutcome};

    // === Config ===
    pub use crate::config::{ClientConfig, ConfigError};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
