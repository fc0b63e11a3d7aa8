//! Data-access trait for the remote food collection

use crate::core::cancel::CancelToken;
use crate::core::error::FoodResult;
use crate::core::food::FoodRecord;
use crate::core::query::{SearchQuery, filter_foods};
use crate::remote::FoodPayload;
use async_trait::async_trait;

/// Operations on the remote `/Food` collection
///
/// Implementations normalize every record they return and map failures onto
/// [`crate::core::error::FoodError`]. Each call honors its cancel token.
#[async_trait]
pub trait FoodApi: Send + Sync {
    /// Fetch the whole collection, in remote order
    async fn list(&self, cancel: &CancelToken) -> FoodResult<Vec<FoodRecord>>;

    /// Create a record; the remote assigns its id
    async fn create(&self, payload: &FoodPayload, cancel: &CancelToken)
    -> FoodResult<FoodRecord>;

    /// Replace the record with the given id
    async fn update(
        &self,
        id: &str,
        payload: &FoodPayload,
        cancel: &CancelToken,
    ) -> FoodResult<FoodRecord>;

    /// Delete the record with the given id
    ///
    /// Success is decided by the response status; the body is ignored.
    async fn delete(&self, id: &str, cancel: &CancelToken) -> FoodResult<()>;
}

/// Search the remote collection by food or restaurant name
///
/// Fetches the full list and filters locally; an empty query returns the list
/// unfiltered. List failures propagate.
pub async fn search<A>(api: &A, query: &str, cancel: &CancelToken) -> FoodResult<Vec<FoodRecord>>
where
    A: FoodApi + ?Sized,
{
    let query = SearchQuery::new(query);
    let foods = api.list(cancel).await?;
    if query.is_empty() {
        return Ok(foods);
    }
    let found = filter_foods(&foods, &query);
    tracing::debug!(query = query.as_str(), found = found.len(), total = foods.len(), "search");
    Ok(found)
}
