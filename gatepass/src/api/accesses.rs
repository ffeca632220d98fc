//! Reporting endpoint for committed admissions.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::SessionStaff;
use crate::error::{AccessError, AppError};
use crate::server::AppState;
use crate::types::{AccessRecord, EventId};

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 500;

/// Pagination parameters.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Page size, capped at 500
    pub limit: Option<usize>,
    /// Records to skip
    pub offset: Option<usize>,
}

/// One page of the access feed.
#[derive(Debug, Serialize)]
pub struct FeedPage {
    /// Records, most recent first
    pub records: Vec<AccessRecord>,
    /// Total records committed for the event
    pub total: usize,
}

/// `GET /api/events/:id/accesses`
///
/// Readable only by staff holding an active scope grant for the event.
pub async fn list(
    State(state): State<AppState>,
    SessionStaff(staff): SessionStaff,
    Path(event_id): Path<Uuid>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedPage>, AppError> {
    let event_id = EventId::from_uuid(event_id);
    state.events.get(event_id).await?;
    if !state.scopes.authorizes(staff.id, event_id).await {
        return Err(AccessError::NotAuthorized.into());
    }

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let records = state.feed.for_event(event_id, limit, offset).await;
    let total = state.feed.count_for_event(event_id).await;
    Ok(Json(FeedPage { records, total }))
}
