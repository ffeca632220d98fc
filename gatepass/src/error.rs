//! Error types for the guest access ledger.
//!
//! [`AccessError`] is the domain-level error returned by ledger and
//! directory operations; [`AppError`] is the HTTP-facing error that
//! serializes as a JSON body with a machine-readable reason code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::EventStatus;

/// Domain errors produced by admission and administration operations.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Scanned credential matches no guest
    #[error("credential does not match any guest")]
    UnknownCredential,

    /// Staff actor holds no active grant for the guest's event
    #[error("staff actor is not authorized for this event")]
    NotAuthorized,

    /// Event status does not permit the admission
    #[error("event does not permit admissions (status: {status})")]
    EventNotActive {
        /// The event's current status
        status: EventStatus,
    },

    /// Entry would exceed the guest's remaining pass balance
    #[error("requested {requested} passes but only {remaining} remain")]
    InsufficientPasses {
        /// People count requested
        requested: u32,
        /// Passes still available
        remaining: u32,
    },

    /// People count is zero or negative
    #[error("people count must be at least 1 (got {requested})")]
    InvalidCount {
        /// The rejected count as received
        requested: i64,
    },

    /// Guest id matches no known guest
    #[error("guest not found")]
    UnknownGuest,

    /// Event id matches no known event
    #[error("event not found")]
    UnknownEvent,

    /// Another guest of the same event already holds this identity number
    #[error("identity number {dni} is already registered for this event")]
    DuplicateIdentity {
        /// The conflicting identity number
        dni: String,
    },

    /// Guest's passes would push the event over its capacity
    #[error("event capacity exceeded ({remaining} passes remain unallocated)")]
    CapacityExceeded {
        /// Passes left before the event capacity is reached
        remaining: u32,
    },

    /// Pass total cannot be reduced below what the guest has already used
    #[error("cannot set passes to {passes}: guest has already used {used}")]
    PassesBelowUsed {
        /// Requested pass total
        passes: u32,
        /// Passes already consumed
        used: u32,
    },

    /// Guest cannot be deleted while admission records reference it
    #[error("guest has recorded admissions and cannot be deleted")]
    GuestHasAccesses,

    /// Malformed or inconsistent request field
    #[error("validation failed: {0}")]
    Validation(String),

    /// Backing store failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl AccessError {
    /// Stable machine-readable reason code for gate devices and clients.
    #[must_use]
    pub const fn reason_code(&self) -> &'static str {
        match self {
            Self::UnknownCredential => "unknown_credential",
            Self::NotAuthorized => "not_authorized",
            Self::EventNotActive { .. } => "event_not_active",
            Self::InsufficientPasses { .. } => "insufficient_passes",
            Self::InvalidCount { .. } => "invalid_count",
            Self::UnknownGuest => "unknown_guest",
            Self::UnknownEvent => "unknown_event",
            Self::DuplicateIdentity { .. } => "duplicate_identity",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::PassesBelowUsed { .. } => "passes_below_used",
            Self::GuestHasAccesses => "guest_has_accesses",
            Self::Validation(_) => "validation_failed",
            Self::Storage(_) => "storage_error",
        }
    }
}

/// Application error with an HTTP status and a JSON body.
///
/// The body shape is `{"code": "...", "message": "..."}` so gate devices
/// can branch on `code` without parsing the human-readable text.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl AppError {
    /// Create an error with an explicit status, code, and message
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// 409 Conflict
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }

    /// 422 Unprocessable Entity
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_failed",
            message,
        )
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    /// 503 Service Unavailable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "unavailable", message)
    }

    /// The HTTP status this error maps to
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The machine-readable reason code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
        } else {
            tracing::debug!(code = %self.code, message = %self.message, "request rejected");
        }
        let body = Json(json!({
            "code": self.code,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        let status = match &err {
            AccessError::UnknownCredential | AccessError::UnknownGuest | AccessError::UnknownEvent => {
                StatusCode::NOT_FOUND
            }
            AccessError::NotAuthorized => StatusCode::FORBIDDEN,
            AccessError::EventNotActive { .. }
            | AccessError::InsufficientPasses { .. }
            | AccessError::GuestHasAccesses => StatusCode::CONFLICT,
            AccessError::InvalidCount { .. }
            | AccessError::DuplicateIdentity { .. }
            | AccessError::CapacityExceeded { .. }
            | AccessError::PassesBelowUsed { .. }
            | AccessError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AccessError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let message = err.to_string();
        Self::new(status, err.reason_code(), message)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}
