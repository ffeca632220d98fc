//! Per-event feed of committed admissions, newest first.
//!
//! The feed is a projection: it receives records through [`AccessSink`]
//! as the ledger commits them and answers reporting queries. It never
//! feeds back into admission decisions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::directory::BoxFuture;
use crate::ledger::AccessSink;
use crate::types::{AccessRecord, EventId};

/// In-memory access feed grouped by event.
#[derive(Debug, Default)]
pub struct AccessFeed {
    by_event: Arc<RwLock<HashMap<EventId, Vec<AccessRecord>>>>,
}

impl AccessFeed {
    /// Create an empty feed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for an event, most recent first, with pagination.
    pub async fn for_event(
        &self,
        event_id: EventId,
        limit: usize,
        offset: usize,
    ) -> Vec<AccessRecord> {
        let by_event = self.by_event.read().await;
        let Some(records) = by_event.get(&event_id) else {
            return Vec::new();
        };
        let mut page: Vec<AccessRecord> = records.clone();
        page.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        page.into_iter().skip(offset).take(limit).collect()
    }

    /// Total records committed for an event.
    pub async fn count_for_event(&self, event_id: EventId) -> usize {
        let by_event = self.by_event.read().await;
        by_event.get(&event_id).map_or(0, Vec::len)
    }
}

impl AccessSink for AccessFeed {
    fn publish(&self, record: AccessRecord) -> BoxFuture<'static, ()> {
        let by_event = Arc::clone(&self.by_event);
        Box::pin(async move {
            let mut by_event = by_event.write().await;
            by_event.entry(record.event_id).or_default().push(record);
        })
    }
}
