//! Event administration endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::SessionStaff;
use crate::error::AppError;
use crate::server::AppState;
use crate::types::{Event, EventId, EventStatus};

/// Body for creating an event.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Event name
    pub name: String,
    /// Upper bound on total guest passes
    pub capacity: u32,
}

/// Body for a lifecycle transition.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status
    pub status: EventStatus,
}

/// Event detail with its pass allocation.
#[derive(Debug, Serialize)]
pub struct EventDetail {
    /// The event
    #[serde(flatten)]
    pub event: Event,
    /// Passes currently allotted to guests
    pub allocated_passes: u32,
}

/// `POST /api/events`
pub async fn create(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let event = state.events.create(req.name, req.capacity).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /api/events`
pub async fn list(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
) -> Json<Vec<Event>> {
    Json(state.events.list().await)
}

/// `GET /api/events/:id`
pub async fn get(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDetail>, AppError> {
    let event_id = EventId::from_uuid(id);
    let event = state.events.get(event_id).await?;
    let allocated_passes = state.ledger.allocated_passes(event_id).await;
    Ok(Json(EventDetail {
        event,
        allocated_passes,
    }))
}

/// `PUT /api/events/:id/status`
pub async fn set_status(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Event>, AppError> {
    let event = state
        .events
        .set_status(EventId::from_uuid(id), req.status)
        .await?;
    Ok(Json(event))
}
