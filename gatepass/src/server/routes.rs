//! Route table.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::health;
use super::state::AppState;
use crate::api::{accesses, events, guests, scan, security, staff};

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/staff", post(staff::provision))
        .route("/api/events", post(events::create).get(events::list))
        .route("/api/events/:id", get(events::get))
        .route("/api/events/:id/status", put(events::set_status))
        .route(
            "/api/events/:id/guests",
            post(guests::create).get(guests::list),
        )
        .route(
            "/api/events/:id/security",
            post(security::assign).get(security::list),
        )
        .route(
            "/api/events/:id/security/:staff_id",
            delete(security::deactivate),
        )
        .route("/api/events/:id/accesses", get(accesses::list))
        .route("/api/guests/:id", put(guests::update).delete(guests::delete))
        .route("/api/scan/validate", post(scan::validate))
        .route("/api/scan/commit", post(scan::commit))
        .with_state(state)
}
