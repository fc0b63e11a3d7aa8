//! Query cache over a [`FoodApi`]
//!
//! [`FoodCache`] keeps the last fetched food list and serves it while fresh.
//! Mutations never merge their result into the list: a successful create,
//! update or delete marks the entry stale so the next read re-fetches. A
//! failed mutation leaves the entry as it was.
//!
//! ```text
//! form ──▶ validate ──▶ sanitize ──▶ FoodApi ──▶ adapt ──▶ invalidate
//!                                       │
//!                        failure ◀──────┘  (cache untouched / rolled back)
//! ```

use crate::config::ClientConfig;
use crate::core::cancel::CancelToken;
use crate::core::error::{Action, FoodError, FoodResult};
use crate::core::events::{CacheEvent, EventBus, EventEnvelope};
use crate::core::food::{FoodFormData, FoodRecord, ValidFood};
use crate::core::query::SearchQuery;
use crate::core::service::{self, FoodApi};
use crate::core::validation::{ValidationErrors, validate_food_form};
use crate::remote::{FoodPayload, sanitize_food};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock, broadcast};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// The cached list and when it was fetched
#[derive(Debug, Clone)]
struct CacheEntry {
    foods: Vec<FoodRecord>,
    fetched_at: Instant,
    stale: bool,
}

/// Successful form submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(FoodRecord),
    Updated(FoodRecord),
}

impl SubmitOutcome {
    /// Success toast
    pub fn notice(&self) -> &'static str {
        match self {
            SubmitOutcome::Created(_) => "Meal added successfully!",
            SubmitOutcome::Updated(_) => "Meal updated successfully!",
        }
    }

    /// Record echoed by the remote
    pub fn record(&self) -> &FoodRecord {
        match self {
            SubmitOutcome::Created(record) | SubmitOutcome::Updated(record) => record,
        }
    }
}

/// Failed form submission
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The form was rejected locally; nothing was sent
    #[error("{0}")]
    Invalid(ValidationErrors),

    /// The remote call failed
    #[error(transparent)]
    Failed(FoodError),
}

impl SubmitError {
    /// Failure toast (empty for field errors, which render next to their inputs)
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Invalid(_) => String::new(),
            SubmitError::Failed(e) => e.user_message(Action::Save),
        }
    }
}

/// Owned cache of the food list
///
/// Share it through an `Arc`. Reads go through an `RwLock`; a separate
/// `Mutex` makes concurrent refreshes collapse into a single list request.
pub struct FoodCache {
    api: Arc<dyn FoodApi>,
    config: ClientConfig,
    entry: RwLock<Option<CacheEntry>>,
    fetch_lock: Mutex<()>,
    // bumped on every invalidation, so a fetch racing a mutation stores a stale entry
    generation: AtomicU64,
    events: EventBus,
}

impl FoodCache {
    pub fn new(api: Arc<dyn FoodApi>, config: ClientConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        Self {
            api,
            config,
            entry: RwLock::new(None),
            fetch_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            events,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Subscribe to cache change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    /// The cached list, if any, fresh or not
    pub async fn snapshot(&self) -> Option<Vec<FoodRecord>> {
        self.entry.read().await.as_ref().map(|e| e.foods.clone())
    }

    /// Whether the next [`foods`](Self::foods) call is served from cache
    pub async fn is_fresh(&self) -> bool {
        self.fresh_foods().await.is_some()
    }

    async fn fresh_foods(&self) -> Option<Vec<FoodRecord>> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| !e.stale && e.fetched_at.elapsed() < self.config.stale_time())
            .map(|e| e.foods.clone())
    }

    /// The food list, from cache when fresh
    pub async fn foods(&self, cancel: &CancelToken) -> FoodResult<Vec<FoodRecord>> {
        if let Some(foods) = self.fresh_foods().await {
            return Ok(foods);
        }

        let _fetching = self.fetch_lock.lock().await;
        if let Some(foods) = self.fresh_foods().await {
            debug!(count = foods.len(), "served by a concurrent refresh");
            return Ok(foods);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let foods = self.api.list(cancel).await?;
        let stale = self.generation.load(Ordering::SeqCst) != generation;

        *self.entry.write().await = Some(CacheEntry {
            foods: foods.clone(),
            fetched_at: Instant::now(),
            stale,
        });
        debug!(count = foods.len(), stale, "food list refreshed");
        self.events.publish(CacheEvent::Refreshed { count: foods.len() });
        Ok(foods)
    }

    /// Search by food or restaurant name
    ///
    /// An empty query is the cached list; anything else re-lists and filters,
    /// without touching the cache.
    pub async fn search(&self, query: &str, cancel: &CancelToken) -> FoodResult<Vec<FoodRecord>> {
        if SearchQuery::new(query).is_empty() {
            return self.foods(cancel).await;
        }
        service::search(self.api.as_ref(), query, cancel).await
    }

    /// Mark the cached list stale
    pub async fn invalidate(&self) {
        self.invalidate_because("manual").await;
    }

    async fn invalidate_because(&self, reason: &str) {
        let mut entry = self.entry.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(entry) = entry.as_mut() {
            entry.stale = true;
        }
        drop(entry);
        info!(reason, "food cache invalidated");
        self.events.publish(CacheEvent::Invalidated {
            reason: reason.to_string(),
        });
    }

    fn prepare(&self, valid: &ValidFood) -> (ValidFood, FoodPayload) {
        let clean = sanitize_food(valid, &self.config);
        let payload = FoodPayload::from_valid(&clean, &self.config);
        (clean, payload)
    }

    /// Validate and create a food
    pub async fn create(&self, form: &FoodFormData, cancel: &CancelToken) -> FoodResult<FoodRecord> {
        let valid = validate_food_form(form)?;
        self.create_valid(&valid, cancel).await
    }

    async fn create_valid(&self, valid: &ValidFood, cancel: &CancelToken) -> FoodResult<FoodRecord> {
        let (_, payload) = self.prepare(valid);
        match self.api.create(&payload, cancel).await {
            Ok(record) => {
                self.invalidate_because("create").await;
                Ok(record)
            }
            Err(e) => {
                warn!(error = %e, "create failed");
                Err(e)
            }
        }
    }

    /// Validate and replace the food with the given id
    pub async fn update(
        &self,
        id: &str,
        form: &FoodFormData,
        cancel: &CancelToken,
    ) -> FoodResult<FoodRecord> {
        let valid = validate_food_form(form)?;
        self.update_valid(id, &valid, cancel).await
    }

    async fn update_valid(
        &self,
        id: &str,
        valid: &ValidFood,
        cancel: &CancelToken,
    ) -> FoodResult<FoodRecord> {
        let (_, payload) = self.prepare(valid);
        match self.api.update(id, &payload, cancel).await {
            Ok(record) => {
                self.invalidate_because("update").await;
                Ok(record)
            }
            Err(e) => {
                warn!(id, error = %e, "update failed");
                Err(e)
            }
        }
    }

    /// Update with the pending values shown immediately
    ///
    /// The matching cached record is rewritten before the request is sent. If
    /// the request fails or is cancelled, the entry is restored as it was and a
    /// `RolledBack` event is published. When another mutation invalidated the
    /// cache in the meantime, the restored entry is marked stale so the next
    /// read re-lists.
    pub async fn update_optimistic(
        &self,
        id: &str,
        form: &FoodFormData,
        cancel: &CancelToken,
    ) -> FoodResult<FoodRecord> {
        let valid = validate_food_form(form)?;
        let (clean, payload) = self.prepare(&valid);

        let (snapshot, generation, applied) = {
            let mut entry = self.entry.write().await;
            let snapshot = entry.clone();
            let generation = self.generation.load(Ordering::SeqCst);
            let applied = match entry.as_mut().and_then(|e| e.foods.iter_mut().find(|f| f.id == id)) {
                Some(record) => {
                    *record = clean.apply_to(record);
                    true
                }
                None => false,
            };
            (snapshot, generation, applied)
        };
        if applied {
            debug!(id, "optimistic update applied");
            self.events.publish(CacheEvent::OptimisticApplied { id: id.to_string() });
        }

        match self.api.update(id, &payload, cancel).await {
            Ok(record) => {
                self.invalidate_because("update").await;
                Ok(record)
            }
            Err(e) => {
                let mut entry = self.entry.write().await;
                let raced = self.generation.load(Ordering::SeqCst) != generation;
                *entry = snapshot.map(|mut restored| {
                    restored.stale |= raced;
                    restored
                });
                drop(entry);
                warn!(id, error = %e, raced, "optimistic update rolled back");
                self.events.publish(CacheEvent::RolledBack { id: id.to_string() });
                Err(e)
            }
        }
    }

    /// Delete the food with the given id
    pub async fn delete(&self, id: &str, cancel: &CancelToken) -> FoodResult<()> {
        match self.api.delete(id, cancel).await {
            Ok(()) => {
                self.invalidate_because("delete").await;
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "delete failed");
                Err(e)
            }
        }
    }

    /// Submit the meal form
    ///
    /// `target` is `None` for "Add a meal" and the record id for "Edit meal".
    pub async fn submit(
        &self,
        form: &FoodFormData,
        target: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<SubmitOutcome, SubmitError> {
        let valid = validate_food_form(form).map_err(SubmitError::Invalid)?;
        match target {
            None => self
                .create_valid(&valid, cancel)
                .await
                .map(SubmitOutcome::Created),
            Some(id) => self
                .update_valid(id, &valid, cancel)
                .await
                .map(SubmitOutcome::Updated),
        }
        .map_err(SubmitError::Failed)
    }
}
