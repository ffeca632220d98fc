//! Guest administration endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::SessionStaff;
use crate::error::AppError;
use crate::ledger::{GuestUpdate, NewGuest};
use crate::server::AppState;
use crate::types::{EventId, Guest, GuestId};

/// Body for registering or editing a guest.
#[derive(Debug, Deserialize)]
pub struct GuestRequest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// National identity number, 8 characters
    pub dni: String,
    /// Table assignment
    pub table_number: u32,
    /// Total allotted passes, 1 through 10
    pub passes: u32,
}

/// Guest as exposed over the API. The credential is surfaced as
/// `qr_code`, the name gate devices render it under.
#[derive(Debug, Serialize)]
pub struct GuestResponse {
    /// Guest identifier
    pub id: GuestId,
    /// Event the guest belongs to
    pub event_id: EventId,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// National identity number
    pub dni: String,
    /// Table assignment
    pub table_number: u32,
    /// Total allotted passes
    pub passes: u32,
    /// Passes consumed so far
    pub used_passes: u32,
    /// The scannable credential
    pub qr_code: String,
    /// Most recent admission, if any
    pub last_access: Option<DateTime<Utc>>,
    /// When the guest was registered
    pub created_at: DateTime<Utc>,
}

impl From<Guest> for GuestResponse {
    fn from(guest: Guest) -> Self {
        Self {
            id: guest.id,
            event_id: guest.event_id,
            first_name: guest.first_name,
            last_name: guest.last_name,
            dni: guest.dni,
            table_number: guest.table_number,
            passes: guest.passes,
            used_passes: guest.used_passes,
            qr_code: guest.credential.as_str().to_string(),
            last_access: guest.last_access,
            created_at: guest.created_at,
        }
    }
}

/// `POST /api/events/:id/guests`
pub async fn create(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Path(event_id): Path<Uuid>,
    Json(req): Json<GuestRequest>,
) -> Result<(StatusCode, Json<GuestResponse>), AppError> {
    let guest = state
        .ledger
        .create_guest(
            EventId::from_uuid(event_id),
            NewGuest {
                first_name: req.first_name,
                last_name: req.last_name,
                dni: req.dni,
                table_number: req.table_number,
                passes: req.passes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(guest.into())))
}

/// `GET /api/events/:id/guests`
pub async fn list(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<GuestResponse>>, AppError> {
    let event_id = EventId::from_uuid(event_id);
    // 404 for unknown events rather than an empty list.
    state.events.get(event_id).await?;
    let guests = state.ledger.guests_for_event(event_id).await;
    Ok(Json(guests.into_iter().map(Into::into).collect()))
}

/// `PUT /api/guests/:id`
pub async fn update(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Path(guest_id): Path<Uuid>,
    Json(req): Json<GuestRequest>,
) -> Result<Json<GuestResponse>, AppError> {
    let guest = state
        .ledger
        .update_guest(
            GuestId::from_uuid(guest_id),
            GuestUpdate {
                first_name: req.first_name,
                last_name: req.last_name,
                dni: req.dni,
                table_number: req.table_number,
                passes: req.passes,
            },
        )
        .await?;
    Ok(Json(guest.into()))
}

/// `DELETE /api/guests/:id`
pub async fn delete(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Path(guest_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.ledger.delete_guest(GuestId::from_uuid(guest_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
