//! Catalog search
//!
//! The remote API has no reliable filter, so search always runs locally over a
//! full list: a case-insensitive substring match on the food name or the
//! restaurant name.

use crate::core::food::FoodRecord;

/// A normalized search term
///
/// An empty (or whitespace-only) term matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.trim().to_lowercase(),
        }
    }

    /// Whether the query matches every record
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, food: &FoodRecord) -> bool {
        self.is_empty()
            || food.name.to_lowercase().contains(&self.needle)
            || food.restaurant.name.to_lowercase().contains(&self.needle)
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Filter a list of records, keeping their order
pub fn filter_foods(foods: &[FoodRecord], query: &SearchQuery) -> Vec<FoodRecord> {
    foods.iter().filter(|f| query.matches(f)).cloned().collect()
}
