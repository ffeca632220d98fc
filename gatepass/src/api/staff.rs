//! Staff provisioning endpoint.
//!
//! Identity management proper lives outside this service; this endpoint
//! only registers an actor and hands back the bearer token the gate
//! device will present.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::server::AppState;
use crate::types::StaffId;

/// Body for provisioning a staff actor.
#[derive(Debug, Deserialize)]
pub struct ProvisionRequest {
    /// Display name
    pub name: String,
}

/// Response carrying the issued bearer token.
#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    /// The new staff actor's id
    pub id: StaffId,
    /// Display name
    pub name: String,
    /// Bearer token for subsequent requests
    pub token: String,
}

/// `POST /api/staff`
pub async fn provision(
    State(state): State<AppState>,
    Json(req): Json<ProvisionRequest>,
) -> Result<(StatusCode, Json<ProvisionResponse>), AppError> {
    let (staff, token) = state.staff.provision(req.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProvisionResponse {
            id: staff.id,
            name: staff.name,
            token: token.as_str().to_string(),
        }),
    ))
}
