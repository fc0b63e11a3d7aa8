//! Cache change notifications
//!
//! The [`EventBus`] lets views re-render when the food cache changes instead
//! of polling it. It uses `tokio::sync::broadcast`, so any number of views can
//! subscribe and a slow one only loses events (lagged), never blocks the cache.
//!
//! ```text
//! FoodCache ──▶ EventBus::publish() ──▶ broadcast channel ──▶ list view
//!                                                         ──▶ search view
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Something that happened to the cached food list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CacheEvent {
    /// A fresh list was fetched and stored
    Refreshed { count: usize },
    /// The entry was marked stale after a mutation
    Invalidated { reason: String },
    /// A pending update was written into the cache ahead of the remote
    OptimisticApplied { id: String },
    /// A failed optimistic update was reverted
    RolledBack { id: String },
}

impl CacheEvent {
    /// Short action name
    pub fn action(&self) -> &str {
        match self {
            CacheEvent::Refreshed { .. } => "refreshed",
            CacheEvent::Invalidated { .. } => "invalidated",
            CacheEvent::OptimisticApplied { .. } => "optimistic_applied",
            CacheEvent::RolledBack { .. } => "rolled_back",
        }
    }

    /// Food id the event relates to, if any
    pub fn food_id(&self) -> Option<&str> {
        match self {
            CacheEvent::OptimisticApplied { id } | CacheEvent::RolledBack { id } => Some(id),
            _ => None,
        }
    }
}

/// Envelope wrapping a cache event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: CacheEvent,
}

impl EventEnvelope {
    pub fn new(event: CacheEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per slow receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of receivers; with none the event is dropped.
    pub fn publish(&self, event: CacheEvent) -> usize {
        tracing::trace!(action = event.action(), "cache event");
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
