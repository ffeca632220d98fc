//! Scan endpoints: validate (dry-run) and commit.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::auth::SessionStaff;
use crate::error::AppError;
use crate::server::AppState;
use crate::types::{AccessRecord, AccessType, GuestSummary};

fn default_people_count() -> i64 {
    1
}

fn default_access_type() -> AccessType {
    AccessType::Entry
}

/// Body for both scan endpoints.
///
/// `people_count` is accepted as a signed integer so that zero and
/// negative values reach the ledger and are rejected with the
/// `invalid_count` reason instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// The scanned credential
    pub qr_code: String,
    /// People covered by this scan
    #[serde(default = "default_people_count")]
    pub people_count: i64,
    /// Entry or exit
    #[serde(default = "default_access_type")]
    pub access_type: AccessType,
    /// Optional operator note, recorded on commit
    #[serde(default)]
    pub observations: Option<String>,
}

/// Response for a committed scan.
#[derive(Debug, Serialize)]
pub struct CommitResponse {
    /// The record standing for this scan
    pub record: AccessRecord,
    /// Guest display name
    pub guest_name: String,
    /// Passes remaining after the commit
    pub remaining_passes: u32,
    /// Whether the scan was absorbed as a duplicate
    pub duplicate: bool,
}

/// `POST /api/scan/validate`
///
/// Dry-run: reports the guest and whether the admission would be
/// accepted, without committing anything.
pub async fn validate(
    State(state): State<AppState>,
    SessionStaff(staff): SessionStaff,
    Json(req): Json<ScanRequest>,
) -> Result<Json<GuestSummary>, AppError> {
    let summary = state
        .ledger
        .validate(&staff, &req.qr_code, req.people_count, req.access_type)
        .await?;
    Ok(Json(summary))
}

/// `POST /api/scan/commit`
///
/// Atomically admits the scan: appends a record and updates the guest's
/// balance, or rejects with a reason code and changes nothing.
pub async fn commit(
    State(state): State<AppState>,
    SessionStaff(staff): SessionStaff,
    Json(req): Json<ScanRequest>,
) -> Result<(StatusCode, Json<CommitResponse>), AppError> {
    let receipt = state
        .ledger
        .commit(
            &staff,
            &req.qr_code,
            req.people_count,
            req.access_type,
            req.observations,
        )
        .await?;

    let status = if receipt.duplicate {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(CommitResponse {
            record: receipt.record,
            guest_name: receipt.guest_name,
            remaining_passes: receipt.remaining_passes,
            duplicate: receipt.duplicate,
        }),
    ))
}
