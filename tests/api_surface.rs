//! Router-level checks: drive the assembled axum router with `oneshot`
//! requests and assert on status codes and JSON bodies.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use lingora_backend::clock::FixedClock;
use lingora_backend::routes::build_router;
use lingora_backend::state::AppState;

fn app() -> Router {
    // Monday 2024-01-01 08:00 — the demo week lies ahead of "now".
    let state = AppState::with_clock(Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0)
            .single()
            .expect("fixed instant"),
    )));
    build_router(Arc::new(state))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("router response");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(&app(), get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn availability_returns_a_full_week_grid() {
    let (status, body) = send(
        &app(),
        get("/api/v1/availability?teacherId=t1&weekOf=2024-01-03"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Wednesday resolves to its Monday anchor.
    assert_eq!(body["weekStart"], "2024-01-01");
    assert_eq!(body["days"].as_array().expect("days").len(), 7);
    assert_eq!(body["timeLabels"].as_array().expect("labels").len(), 33);
    assert_eq!(body["timeLabels"][0], "06:00");
    assert_eq!(body["timeLabels"][32], "22:00");
}

#[tokio::test]
async fn batch_create_then_availability_shows_the_slots() {
    let app = app();
    let (status, body) = send(
        &app,
        post(
            "/api/v1/availability/batch",
            json!({
                "actingTeacherId": "t1",
                "teacherId": "t1",
                "slots": [
                    { "date": "2024-01-02", "time": "09:00" },
                    { "date": "2024-01-03", "time": "10:00" }
                ],
                "durationMinutes": 60
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], 2);
    assert_eq!(body["skippedExisting"], 0);

    let (status, week) = send(
        &app,
        get("/api/v1/availability?teacherId=t1&weekOf=2024-01-01"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let total: usize = week["days"]
        .as_array()
        .expect("days")
        .iter()
        .map(|d| d["slots"].as_array().map(Vec::len).unwrap_or(0))
        .sum();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn invalid_duration_is_a_bad_request() {
    let (status, body) = send(
        &app(),
        post(
            "/api/v1/availability/batch",
            json!({
                "actingTeacherId": "t1",
                "teacherId": "t1",
                "slots": [{ "date": "2024-01-02", "time": "09:00" }],
                "durationMinutes": 45
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn acting_identity_mismatch_is_forbidden() {
    let (status, _) = send(
        &app(),
        post(
            "/api/v1/availability/batch",
            json!({
                "actingTeacherId": "intruder",
                "teacherId": "t1",
                "slots": [{ "date": "2024-01-02", "time": "09:00" }],
                "durationMinutes": 30
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn recurring_projects_the_selection_across_weeks() {
    let app = app();
    let (status, body) = send(
        &app,
        post(
            "/api/v1/availability/recurring",
            json!({
                "actingTeacherId": "t1",
                "teacherId": "t1",
                "slots": [
                    { "date": "2024-01-01", "time": "18:00" },
                    { "date": "2024-01-03", "time": "19:00" }
                ],
                "durationMinutes": 60,
                "weekStart": "2024-01-01",
                "numberOfWeeks": 4
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["planned"], 8);
    assert_eq!(body["created"], 8);

    // Week 3 carries its projected copies.
    let (_, week) = send(
        &app,
        get("/api/v1/availability?teacherId=t1&weekOf=2024-01-22"),
    )
    .await;
    let total: usize = week["days"]
        .as_array()
        .expect("days")
        .iter()
        .map(|d| d["slots"].as_array().map(Vec::len).unwrap_or(0))
        .sum();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn delete_requires_ownership_and_an_existing_slot() {
    let app = app();
    let (_, created) = send(
        &app,
        post(
            "/api/v1/availability/batch",
            json!({
                "actingTeacherId": "t1",
                "teacherId": "t1",
                "slots": [{ "date": "2024-01-02", "time": "09:00" }],
                "durationMinutes": 30
            }),
        ),
    )
    .await;
    let id = created["grid"]["days"]
        .as_array()
        .expect("days")
        .iter()
        .flat_map(|d| d["slots"].as_array().cloned().unwrap_or_default())
        .next()
        .expect("created slot")["id"]
        .as_str()
        .expect("slot id")
        .to_string();

    let other = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/availability/{id}?teacherId=t2"))
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(&app, other).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let own = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/availability/{id}?teacherId=t1"))
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(&app, own).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let gone = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/availability/{id}?teacherId=t1"))
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(&app, gone).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lessons_endpoint_lists_the_seed_bank() {
    let (status, body) = send(&app(), get("/api/v1/lessons")).await;
    assert_eq!(status, StatusCode::OK);
    let lessons = body.as_array().expect("lesson list");
    assert!(lessons.len() >= 2);
    let ids: Vec<&str> = lessons
        .iter()
        .filter_map(|l| l["id"].as_str())
        .collect();
    assert!(ids.contains(&"l-daily-routines"));
    assert!(ids.contains(&"l-ordering-food"));
    assert_eq!(
        lessons
            .iter()
            .find(|l| l["id"] == "l-daily-routines")
            .expect("seed lesson")["slideCount"],
        5
    );
}

#[tokio::test]
async fn export_endpoint_builds_and_logs_a_package() {
    let app = app();
    let (status, body) = send(
        &app,
        post(
            "/api/v1/export-curriculum",
            json!({
                "teacherId": "t1",
                "lessonIds": ["l-daily-routines"],
                "format": "scorm",
                "options": { "packageName": "Unit One" }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["fileName"], "Unit-One-scorm.zip");
    assert_eq!(body["lessonCount"], 1);
    assert!(body["downloadData"].is_string());
    assert!(body.get("downloadUrl").is_none());

    let (status, logs) = send(&app, get("/api/v1/exports")).await;
    assert_eq!(status, StatusCode::OK);
    let logs = logs.as_array().expect("log list");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["fileName"], "Unit-One-scorm.zip");
    assert_eq!(logs[0]["format"], "scorm");
    assert_eq!(logs[0]["teacherId"], "t1");

    // History filters by the requesting teacher.
    let (_, mine) = send(&app, get("/api/v1/exports?teacherId=t1")).await;
    assert_eq!(mine.as_array().expect("log list").len(), 1);
    let (_, other) = send(&app, get("/api/v1/exports?teacherId=t2")).await;
    assert!(other.as_array().expect("log list").is_empty());
}

#[tokio::test]
async fn export_with_no_matching_lessons_fails_cleanly() {
    let (status, body) = send(
        &app(),
        post(
            "/api/v1/export-curriculum",
            json!({ "lessonIds": ["missing"], "format": "html5" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}
