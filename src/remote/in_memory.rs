//! In-memory implementation of FoodApi for testing and offline development

use crate::core::adapter::{normalize_food, normalize_list};
use crate::core::cancel::CancelToken;
use crate::core::error::{FoodError, FoodResult};
use crate::core::field::coerce_text;
use crate::core::food::FoodRecord;
use crate::core::service::FoodApi;
use crate::remote::FoodPayload;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// A failure to return from the next call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InjectedFailure {
    Status(u16),
    Network,
}

#[derive(Debug, Default)]
struct Store {
    records: Vec<Value>,
    next_id: u64,
    fail_next: Option<InjectedFailure>,
    latency: Duration,
}

/// In-memory food API
///
/// Stores records in their raw remote shape, so legacy flat records and
/// malformed ones go through the same adapter as real responses. Ids are
/// increasing numeric strings. Clones share the same store.
#[derive(Clone, Default)]
pub struct InMemoryFoodApi {
    store: Arc<RwLock<Store>>,
    list_calls: Arc<AtomicUsize>,
}

impl InMemoryFoodApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an API holding the given raw records
    pub fn with_records(records: Vec<Value>) -> Self {
        let api = Self::new();
        for record in records {
            // the lock is fresh and uncontended
            let _ = api.insert_raw(record);
        }
        api
    }

    /// Insert a record exactly as given
    ///
    /// A numeric `id`, as a number or a digit string, bumps the id counter
    /// past it.
    pub fn insert_raw(&self, record: Value) -> FoodResult<()> {
        let mut store = self.write()?;
        if let Some(id) = record_id(&record).and_then(|id| id.parse::<u64>().ok()) {
            store.next_id = store.next_id.max(id);
        }
        store.records.push(record);
        Ok(())
    }

    /// Raw records as they are stored
    pub fn raw_records(&self) -> FoodResult<Vec<Value>> {
        Ok(self.read()?.records.clone())
    }

    /// Make the next call fail with the given HTTP status
    pub fn fail_next(&self, status: u16) -> FoodResult<()> {
        self.write()?.fail_next = Some(InjectedFailure::Status(status));
        Ok(())
    }

    /// Make the next call fail as if the remote were unreachable
    pub fn fail_next_network(&self) -> FoodResult<()> {
        self.write()?.fail_next = Some(InjectedFailure::Network);
        Ok(())
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Duration) -> FoodResult<()> {
        self.write()?.latency = latency;
        Ok(())
    }

    /// Number of `list` calls that reached the store
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn read(&self) -> FoodResult<std::sync::RwLockReadGuard<'_, Store>> {
        self.store
            .read()
            .map_err(|e| FoodError::Internal(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> FoodResult<std::sync::RwLockWriteGuard<'_, Store>> {
        self.store
            .write()
            .map_err(|e| FoodError::Internal(format!("Failed to acquire write lock: {}", e)))
    }

    /// Simulate the round trip: wait, then consume an injected failure
    async fn round_trip(&self, method: &str, path: &str) -> FoodResult<()> {
        let latency = self.read()?.latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let injected = self.write()?.fail_next.take();
        match injected {
            Some(InjectedFailure::Status(status)) => {
                tracing::error!(method, path, status, "injected error status");
                Err(not_ok(method, path, status))
            }
            Some(InjectedFailure::Network) => Err(FoodError::Network {
                message: "connection refused (injected)".to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn not_ok(method: &str, path: &str, status: u16) -> FoodError {
    FoodError::Transport {
        method: method.to_string(),
        path: path.to_string(),
        status,
    }
}

/// Id of a raw record, read the same way the adapter reads it
fn record_id(record: &Value) -> Option<String> {
    record.get("id").and_then(coerce_text)
}

fn payload_fields(payload: &FoodPayload) -> FoodResult<Map<String, Value>> {
    match serde_json::to_value(payload)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(FoodError::Internal("payload is not a JSON object".to_string())),
    }
}

#[async_trait]
impl FoodApi for InMemoryFoodApi {
    async fn list(&self, cancel: &CancelToken) -> FoodResult<Vec<FoodRecord>> {
        cancel
            .run(async {
                self.list_calls.fetch_add(1, Ordering::SeqCst);
                self.round_trip("GET", "/Food").await?;
                let records = self.read()?.records.clone();
                Ok(normalize_list(records))
            })
            .await
    }

    async fn create(
        &self,
        payload: &FoodPayload,
        cancel: &CancelToken,
    ) -> FoodResult<FoodRecord> {
        cancel
            .run(async {
                self.round_trip("POST", "/Food").await?;
                let mut fields = payload_fields(payload)?;

                let mut store = self.write()?;
                store.next_id += 1;
                fields.insert("id".to_string(), Value::String(store.next_id.to_string()));
                fields.insert(
                    "createdAt".to_string(),
                    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
                );
                let record = Value::Object(fields);
                store.records.push(record.clone());
                drop(store);

                Ok(normalize_food(&record)?)
            })
            .await
    }

    async fn update(
        &self,
        id: &str,
        payload: &FoodPayload,
        cancel: &CancelToken,
    ) -> FoodResult<FoodRecord> {
        let path = format!("/Food/{}", id);
        cancel
            .run(async {
                self.round_trip("PUT", &path).await?;
                let fields = payload_fields(payload)?;

                let mut store = self.write()?;
                let record = store
                    .records
                    .iter_mut()
                    .find(|r| record_id(r).as_deref() == Some(id))
                    .ok_or_else(|| not_ok("PUT", &path, 404))?;
                if let Value::Object(existing) = &mut *record {
                    existing.extend(fields);
                }
                let updated = record.clone();
                drop(store);

                Ok(normalize_food(&updated)?)
            })
            .await
    }

    async fn delete(&self, id: &str, cancel: &CancelToken) -> FoodResult<()> {
        let path = format!("/Food/{}", id);
        cancel
            .run(async {
                self.round_trip("DELETE", &path).await?;
                let mut store = self.write()?;
                let index = store
                    .records
                    .iter()
                    .position(|r| record_id(r).as_deref() == Some(id))
                    .ok_or_else(|| not_ok("DELETE", &path, 404))?;
                store.records.remove(index);
                Ok(())
            })
            .await
    }
}
