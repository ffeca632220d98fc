//! HTTP API tests driven through the router with `tower::ServiceExt`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use gatepass::config::Config;
use gatepass::server::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::in_memory(&Config::default()))
}

fn app_with_dedup(window_secs: u64) -> Router {
    let mut config = Config::default();
    config.ledger.scan_dedup_window_secs = window_secs;
    router(AppState::in_memory(&config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn provision_staff(app: &Router, name: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/staff",
        None,
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

/// Creates event + guest + scoped staff, returns (token, event_id, qr_code).
async fn seed_running_event(app: &Router, passes: u32) -> (String, String, String) {
    let (staff_id, token) = provision_staff(app, "Door Crew").await;

    let (status, event) = send(
        app,
        Method::POST,
        "/api/events",
        Some(&token),
        Some(json!({ "name": "Opening Gala", "capacity": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = event["id"].as_str().unwrap().to_string();

    let (status, guest) = send(
        app,
        Method::POST,
        &format!("/api/events/{event_id}/guests"),
        Some(&token),
        Some(json!({
            "first_name": "Nora",
            "last_name": "Quin",
            "dni": "70000001",
            "table_number": 5,
            "passes": passes,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let qr_code = guest["qr_code"].as_str().unwrap().to_string();

    let (status, _) = send(
        app,
        Method::POST,
        &format!("/api/events/{event_id}/security"),
        Some(&token),
        Some(json!({ "staff_id": staff_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        app,
        Method::PUT,
        &format!("/api/events/{event_id}/status"),
        Some(&token),
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (token, event_id, qr_code)
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn api_requires_a_bearer_token() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = send(&app, Method::GET, "/api/events", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn scan_commit_happy_path() {
    let app = app();
    let (token, event_id, qr_code) = seed_running_event(&app, 4).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["guest_name"], "Nora Quin");
    assert_eq!(body["remaining_passes"], 1);
    assert_eq!(body["duplicate"], false);
    assert_eq!(body["record"]["people_count"], 3);
    assert_eq!(body["record"]["access_type"], "entry");

    let (status, feed) = send(
        &app,
        Method::GET,
        &format!("/api/events/{event_id}/accesses"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed["total"], 1);
    assert_eq!(feed["records"][0]["people_count"], 3);
}

#[tokio::test]
async fn scan_rejections_carry_reason_codes() {
    let app = app();
    let (token, event_id, qr_code) = seed_running_event(&app, 2).await;

    // Unknown credential.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&token),
        Some(json!({ "qr_code": "does-not-exist", "people_count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "unknown_credential");

    // Zero people.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "invalid_count");

    // Overdraw.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "insufficient_passes");

    // Completed event.
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/events/{event_id}/status"),
        Some(&token),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "event_not_active");

    // Unauthorized staff.
    let (_, other_token) = provision_staff(&app, "Other Crew").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&other_token),
        Some(json!({ "qr_code": qr_code, "people_count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "not_authorized");
}

#[tokio::test]
async fn scan_validate_reports_without_committing() {
    let app = app();
    let (token, _event_id, qr_code) = seed_running_event(&app, 4).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scan/validate",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Nora Quin");
    assert_eq!(body["available_passes"], 4);
    assert_eq!(body["event_name"], "Opening Gala");

    // Still 4 available: validate committed nothing.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scan/validate",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_passes"], 4);
}

#[tokio::test]
async fn duplicate_scan_returns_the_prior_record() {
    let app = app_with_dedup(60);
    let (token, event_id, qr_code) = seed_running_event(&app, 6).await;

    let (status, first) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, second) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["duplicate"], true);
    assert_eq!(second["record"]["id"], first["record"]["id"]);
    assert_eq!(second["remaining_passes"], 4);

    let (_, feed) = send(
        &app,
        Method::GET,
        &format!("/api/events/{event_id}/accesses"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(feed["total"], 1);
}

#[tokio::test]
async fn guest_administration_rules() {
    let app = app();
    let (token, event_id, qr_code) = seed_running_event(&app, 4).await;

    // Duplicate identity for the same event.
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/events/{event_id}/guests"),
        Some(&token),
        Some(json!({
            "first_name": "Copy",
            "last_name": "Cat",
            "dni": "70000001",
            "table_number": 1,
            "passes": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "duplicate_identity");

    // Consume passes, then try to shrink the allotment below them.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, guests) = send(
        &app,
        Method::GET,
        &format!("/api/events/{event_id}/guests"),
        Some(&token),
        None,
    )
    .await;
    let guest_id = guests[0]["id"].as_str().unwrap().to_string();
    assert_eq!(guests[0]["used_passes"], 3);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/guests/{guest_id}"),
        Some(&token),
        Some(json!({
            "first_name": "Nora",
            "last_name": "Quin",
            "dni": "70000001",
            "table_number": 5,
            "passes": 2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "passes_below_used");

    // A guest with admissions cannot be deleted.
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/guests/{guest_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "guest_has_accesses");
}

#[tokio::test]
async fn capacity_is_enforced_at_registration() {
    let app = app();
    let (_staff_id, token) = provision_staff(&app, "Admin").await;

    let (_, event) = send(
        &app,
        Method::POST,
        "/api/events",
        Some(&token),
        Some(json!({ "name": "Small Room", "capacity": 3 })),
    )
    .await;
    let event_id = event["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/events/{event_id}/guests"),
        Some(&token),
        Some(json!({
            "first_name": "A",
            "last_name": "One",
            "dni": "80000001",
            "table_number": 1,
            "passes": 2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/events/{event_id}/guests"),
        Some(&token),
        Some(json!({
            "first_name": "B",
            "last_name": "Two",
            "dni": "80000002",
            "table_number": 1,
            "passes": 2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "capacity_exceeded");

    let (status, detail) = send(
        &app,
        Method::GET,
        &format!("/api/events/{event_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["allocated_passes"], 2);
    assert_eq!(detail["capacity"], 3);
}

#[tokio::test]
async fn scope_grants_can_be_revoked_over_http() {
    let app = app();
    let (token, event_id, qr_code) = seed_running_event(&app, 4).await;

    let (_, grants) = send(
        &app,
        Method::GET,
        &format!("/api/events/{event_id}/security"),
        Some(&token),
        None,
    )
    .await;
    let staff_id = grants[0]["staff_id"].as_str().unwrap().to_string();
    assert_eq!(grants[0]["active"], true);

    let (status, grant) = send(
        &app,
        Method::DELETE,
        &format!("/api/events/{event_id}/security/{staff_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grant["active"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scan/commit",
        Some(&token),
        Some(json!({ "qr_code": qr_code, "people_count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "not_authorized");
}
