//! Scope grant administration: which staff may scan for which event.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::SessionStaff;
use crate::error::AppError;
use crate::server::AppState;
use crate::types::{EventId, ScopeGrant, StaffId};

/// Body for assigning scan scope.
#[derive(Debug, Deserialize)]
pub struct AssignScopeRequest {
    /// The staff actor to grant scope to
    pub staff_id: StaffId,
}

/// `POST /api/events/:id/security`
pub async fn assign(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Path(event_id): Path<Uuid>,
    Json(req): Json<AssignScopeRequest>,
) -> Result<(StatusCode, Json<ScopeGrant>), AppError> {
    let event_id = EventId::from_uuid(event_id);
    state.events.get(event_id).await?;
    let grant = state.scopes.assign(req.staff_id, event_id).await;
    Ok((StatusCode::CREATED, Json(grant)))
}

/// `DELETE /api/events/:id/security/:staff_id`
pub async fn deactivate(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Path((event_id, staff_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ScopeGrant>, AppError> {
    let grant = state
        .scopes
        .deactivate(StaffId::from_uuid(staff_id), EventId::from_uuid(event_id))
        .await
        .ok_or_else(|| AppError::not_found("no scope grant for this staff and event"))?;
    Ok(Json(grant))
}

/// `GET /api/events/:id/security`
pub async fn list(
    State(state): State<AppState>,
    SessionStaff(_staff): SessionStaff,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<ScopeGrant>>, AppError> {
    let event_id = EventId::from_uuid(event_id);
    state.events.get(event_id).await?;
    Ok(Json(state.scopes.grants_for_event(event_id).await))
}
