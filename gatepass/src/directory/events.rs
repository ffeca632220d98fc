//! Event directory: lifecycle and lookup for events.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::BoxFuture;
use crate::error::AccessError;
use crate::types::{Event, EventId, EventStatus};

/// Lookup and lifecycle operations for events.
pub trait EventDirectory: Send + Sync {
    /// Fetch an event by id.
    fn get(&self, id: EventId) -> BoxFuture<'_, Result<Event, AccessError>>;

    /// Create a new event in `Scheduled` status.
    fn create(&self, name: String, capacity: u32) -> BoxFuture<'_, Result<Event, AccessError>>;

    /// Transition an event to a new lifecycle status.
    ///
    /// Transitions are unrestricted: operators may reopen a completed
    /// event or cancel a running one.
    fn set_status(
        &self,
        id: EventId,
        status: EventStatus,
    ) -> BoxFuture<'_, Result<Event, AccessError>>;

    /// List all events, newest first.
    fn list(&self) -> BoxFuture<'_, Vec<Event>>;
}

/// In-memory event directory backed by a `RwLock`ed map.
#[derive(Debug, Default)]
pub struct InMemoryEventDirectory {
    events: Arc<RwLock<HashMap<EventId, Event>>>,
}

impl InMemoryEventDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventDirectory for InMemoryEventDirectory {
    fn get(&self, id: EventId) -> BoxFuture<'_, Result<Event, AccessError>> {
        Box::pin(async move {
            let events = self.events.read().await;
            events.get(&id).cloned().ok_or(AccessError::UnknownEvent)
        })
    }

    fn create(&self, name: String, capacity: u32) -> BoxFuture<'_, Result<Event, AccessError>> {
        Box::pin(async move {
            if name.trim().is_empty() {
                return Err(AccessError::Validation("event name is required".into()));
            }
            let event = Event::new(EventId::new(), name, capacity, Utc::now());
            let mut events = self.events.write().await;
            events.insert(event.id, event.clone());
            Ok(event)
        })
    }

    fn set_status(
        &self,
        id: EventId,
        status: EventStatus,
    ) -> BoxFuture<'_, Result<Event, AccessError>> {
        Box::pin(async move {
            let mut events = self.events.write().await;
            let event = events.get_mut(&id).ok_or(AccessError::UnknownEvent)?;
            event.status = status;
            Ok(event.clone())
        })
    }

    fn list(&self) -> BoxFuture<'_, Vec<Event>> {
        Box::pin(async move {
            let events = self.events.read().await;
            let mut all: Vec<Event> = events.values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            all
        })
    }
}
