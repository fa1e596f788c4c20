use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use seat_hold::{
    create_router,
    hold::DEFAULT_HOLD_DURATION,
    AppState, ManualClock, MemoryStore, SeatHoldTimer,
};

const T0: i64 = 1_700_000_000_000;

fn app(clock: &ManualClock) -> Router {
    let timer = SeatHoldTimer::new(
        Arc::new(MemoryStore::new()),
        Arc::new(clock.clone()),
        DEFAULT_HOLD_DURATION,
    );
    let state = AppState::new(Arc::new(timer), 20554, "127.0.0.1".to_string());
    create_router(Arc::new(state))
}

async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn start_reports_a_five_minute_hold() {
    let clock = ManualClock::new(T0);
    let app = app(&clock);

    let (status, body) = call(&app, "POST", "/hold/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["message"], "Seat hold started");
    assert_eq!(body["hold"]["active"], true);
    assert_eq!(body["hold"]["remaining_seconds"], 300);
    assert_eq!(body["hold"]["remaining_display"], "5:00");
    assert!(body["hold"]["deadline"].is_string());
}

#[tokio::test]
async fn second_start_resumes_instead_of_extending() {
    let clock = ManualClock::new(T0);
    let app = app(&clock);

    let (_, first) = call(&app, "POST", "/hold/start").await;
    clock.advance_secs(45);
    let (_, second) = call(&app, "POST", "/hold/start").await;

    assert_eq!(second["message"], "Seat hold already running");
    assert_eq!(second["hold"]["deadline"], first["hold"]["deadline"]);
    assert_eq!(second["hold"]["remaining_seconds"], 255);
    assert_eq!(second["hold"]["remaining_display"], "4:15");
}

#[tokio::test]
async fn stop_and_reset_clear_the_hold() {
    let clock = ManualClock::new(T0);
    let app = app(&clock);

    call(&app, "POST", "/hold/start").await;
    let (status, body) = call(&app, "POST", "/hold/stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inactive");
    assert_eq!(body["hold"]["active"], false);
    assert_eq!(body["hold"]["remaining_seconds"], 0);
    assert_eq!(body["hold"]["remaining_display"], "0:00");
    assert!(body["hold"]["deadline"].is_null());

    call(&app, "POST", "/hold/start").await;
    let (_, body) = call(&app, "POST", "/hold/reset").await;
    assert_eq!(body["message"], "Seat hold abandoned");
    assert_eq!(body["hold"]["active"], false);
}

#[tokio::test]
async fn status_tracks_last_action() {
    let clock = ManualClock::new(T0);
    let app = app(&clock);

    let (_, idle) = call(&app, "GET", "/status").await;
    assert_eq!(idle["hold"]["active"], false);
    assert_eq!(idle["expirations"], 0);
    assert!(idle["last_action"].is_null());

    call(&app, "POST", "/hold/start").await;
    let (status, body) = call(&app, "GET", "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hold"]["active"], true);
    assert_eq!(body["last_action"], "start");
    assert_eq!(body["port"], 20554);
}

#[tokio::test]
async fn health() {
    let clock = ManualClock::new(T0);
    let (status, body) = call(&app(&clock), "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
