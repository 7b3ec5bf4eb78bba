//! Integration tests for checkin-web API endpoints
//!
//! Runs the router against the in-memory store and a recording
//! notifier, covering the full intake → checklist → finalize → tags
//! path plus the dashboard view.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::util::ServiceExt; // for `oneshot`

use checkin_common::notify::{CompletionPayload, Notifier};
use checkin_common::store::MemoryStore;
use checkin_common::{Error, Result};
use checkin_web::{build_router, AppState};

#[derive(Default)]
struct RecordingNotifier {
    payloads: Mutex<Vec<CompletionPayload>>,
    fail: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_completion(&self, payload: &CompletionPayload) -> Result<()> {
        self.payloads.lock().await.push(payload.clone());
        if self.fail {
            return Err(Error::Notify("relay down".into()));
        }
        Ok(())
    }
}

struct TestApp {
    router: axum::Router,
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
}

fn setup_app() -> TestApp {
    setup_app_with_notifier(RecordingNotifier::default())
}

fn setup_app_with_notifier(notifier: RecordingNotifier) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(notifier);
    let state = AppState::new(store.clone(), notifier.clone());
    TestApp {
        router: build_router(state),
        store,
        notifier,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn intake_body() -> Value {
    json!({
        "installer": {
            "name": "Jordan Reyes",
            "email": "jordan@acmebaths.com",
            "phone": "+15551234567",
            "company": "Acme Baths"
        },
        "location": {
            "address": "12 Main St",
            "city": "Springfield",
            "state": "MA",
            "zip": "01101"
        },
        "project": {
            "name": "Tub-to-shower conversion",
            "description": "Full demo and rebuild",
            "client": "R. Alvarez"
        }
    })
}

/// Run intake and return the new check-in id
async fn create_checkin(app: &TestApp) -> String {
    let response = app
        .router
        .clone()
        .oneshot(send_json("POST", "/api/checkins", intake_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    body["checkin_id"].as_str().unwrap().to_string()
}

async fn toggle_all(app: &TestApp, checkin_id: &str) {
    for item_id in 1..=17 {
        let uri = format!("/api/checkins/{}/items/{}/toggle", checkin_id, item_id);
        let response = app.router.clone().oneshot(post_empty(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn health_endpoint_reports_module() {
    let app = setup_app();
    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "checkin-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn catalog_endpoint_lists_all_seventeen_items() {
    let app = setup_app();
    let response = app
        .router
        .clone()
        .oneshot(get("/api/checklist-items"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 17);
    assert_eq!(items[0]["id"], "1");
    assert_eq!(items[0]["is_required"], true);
    assert_eq!(items[16]["item_name"], "Flush shower valve");
}

#[tokio::test]
async fn valid_intake_creates_installer_and_checkin() {
    let app = setup_app();
    let checkin_id = create_checkin(&app).await;
    assert!(checkin_id.starts_with("CHK-"));

    let installers = app.store.installers().await;
    let checkins = app.store.checkins().await;
    assert_eq!(installers.len(), 1);
    assert_eq!(checkins.len(), 1);
    assert_eq!(checkins[0].status.as_str(), "in_progress");
}

#[tokio::test]
async fn invalid_intake_returns_field_errors_and_writes_nothing() {
    let app = setup_app();
    let mut body = intake_body();
    body["installer"]["name"] = json!("A");

    let response = app
        .router
        .clone()
        .oneshot(send_json("POST", "/api/checkins", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "validation_failed");
    assert_eq!(body["fields"][0]["field"], "name");

    assert!(app.store.installers().await.is_empty());
    assert!(app.store.checkins().await.is_empty());
}

#[tokio::test]
async fn toggle_updates_progress() {
    let app = setup_app();
    let checkin_id = create_checkin(&app).await;

    let uri = format!("/api/checkins/{}/items/1/toggle", checkin_id);
    let response = app.router.clone().oneshot(post_empty(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["state"]["completed"], true);
    assert_eq!(body["progress"]["completed"], 1);
    assert_eq!(body["progress"]["total"], 17);
    assert_eq!(body["progress"]["percent"], 6);
    assert_eq!(body["progress"]["ready_to_finalize"], false);
}

#[tokio::test]
async fn actions_on_unknown_checkin_are_not_found() {
    let app = setup_app();
    let response = app
        .router
        .clone()
        .oneshot(post_empty("/api/checkins/CHK-GHOST/items/1/toggle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["hint"]
        .as_str()
        .unwrap()
        .contains("start from the beginning"));
}

#[tokio::test]
async fn save_persists_checklist_without_status_change() {
    let app = setup_app();
    let checkin_id = create_checkin(&app).await;

    let uri = format!("/api/checkins/{}/items/3/notes", checkin_id);
    let response = app
        .router
        .clone()
        .oneshot(send_json("PUT", &uri, json!({ "notes": "card on file" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/checkins/{}/save", checkin_id);
    let response = app.router.clone().oneshot(post_empty(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let checkins = app.store.checkins().await;
    assert_eq!(checkins[0].checklist_data["3"].notes, "card on file");
    assert_eq!(checkins[0].status.as_str(), "in_progress");
}

#[tokio::test]
async fn finalize_rejected_while_items_remain() {
    let app = setup_app();
    let checkin_id = create_checkin(&app).await;

    // 16 of 17
    for item_id in 1..=16 {
        let uri = format!("/api/checkins/{}/items/{}/toggle", checkin_id, item_id);
        app.router.clone().oneshot(post_empty(&uri)).await.unwrap();
    }

    let uri = format!("/api/checkins/{}/finalize", checkin_id);
    let response = app.router.clone().oneshot(post_empty(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "checklist_incomplete");

    let checkins = app.store.checkins().await;
    assert_eq!(checkins[0].status.as_str(), "in_progress");
    assert!(app.notifier.payloads.lock().await.is_empty());
}

#[tokio::test]
async fn finalize_completes_and_notifies() {
    let app = setup_app();
    let checkin_id = create_checkin(&app).await;
    toggle_all(&app, &checkin_id).await;

    let uri = format!("/api/checkins/{}/finalize", checkin_id);
    let response = app.router.clone().oneshot(post_empty(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "completed");
    assert!(body["completion_time"].is_string());

    let checkins = app.store.checkins().await;
    assert_eq!(checkins[0].status.as_str(), "completed");
    assert!(checkins[0].completion_time.is_some());

    let payloads = app.notifier.payloads.lock().await;
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].checkin_id, checkin_id);
}

#[tokio::test]
async fn notifier_failure_does_not_fail_finalize() {
    let app = setup_app_with_notifier(RecordingNotifier {
        fail: true,
        ..Default::default()
    });
    let checkin_id = create_checkin(&app).await;
    toggle_all(&app, &checkin_id).await;

    let uri = format!("/api/checkins/{}/finalize", checkin_id);
    let response = app.router.clone().oneshot(post_empty(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(app.notifier.payloads.lock().await.len(), 1);
    let checkins = app.store.checkins().await;
    assert_eq!(checkins[0].status.as_str(), "completed");
}

#[tokio::test]
async fn tags_unavailable_until_completed() {
    let app = setup_app();
    let checkin_id = create_checkin(&app).await;

    let uri = format!("/api/checkins/{}/tags", checkin_id);
    let response = app.router.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    toggle_all(&app, &checkin_id).await;
    let finalize = format!("/api/checkins/{}/finalize", checkin_id);
    app.router
        .clone()
        .oneshot(post_empty(&finalize))
        .await
        .unwrap();

    let response = app.router.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["checkin_id"], checkin_id);
    assert_eq!(body["installer_name"], "Jordan Reyes");
    assert_eq!(body["completion_percent"], 100);
    assert!(body["qr_data"].as_str().unwrap().contains("installer_checkin"));
    assert!(body["completion_display"].is_string());
}

#[tokio::test]
async fn tags_for_unknown_checkin_redirect_to_intake() {
    let app = setup_app();
    let response = app
        .router
        .clone()
        .oneshot(get("/api/checkins/CHK-GHOST/tags"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_reports_stats_and_filters() {
    let app = setup_app();
    let first = create_checkin(&app).await;
    toggle_all(&app, &first).await;
    let finalize = format!("/api/checkins/{}/finalize", first);
    app.router
        .clone()
        .oneshot(post_empty(&finalize))
        .await
        .unwrap();

    let _second = create_checkin(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/dashboard"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_checkins"], 2);
    assert_eq!(body["completed_checkins"], 1);
    assert_eq!(body["in_progress_checkins"], 1);
    assert_eq!(body["completion_rate"], 50);
    assert_eq!(body["checkins"].as_array().unwrap().len(), 2);

    // status filter narrows the list but not the stats
    let response = app
        .router
        .clone()
        .oneshot(get("/api/dashboard?status=completed"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_checkins"], 2);
    assert_eq!(body["checkins"].as_array().unwrap().len(), 1);
    assert_eq!(body["checkins"][0]["status"], "completed");

    // search that matches nothing
    let response = app
        .router
        .clone()
        .oneshot(get("/api/dashboard?search=nomatch"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["checkins"].as_array().unwrap().len(), 0);
}
