//! Tests for the completion email function: rendering, recipient
//! fallback, and the HTTP contract

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::util::ServiceExt; // for `oneshot`

use checkin_common::model::ItemState;
use checkin_common::notify::CompletionPayload;
use checkin_common::{Error, Result};
use checkin_notify::mailer::{EmailMessage, Mailer};
use checkin_notify::render::{completion_email, completion_stats, subject};
use checkin_notify::{build_router, recipient_for, NotifyState};

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        self.sent.lock().await.push(message.clone());
        if self.fail {
            return Err(Error::Notify("relay timeout".into()));
        }
        Ok(())
    }
}

fn sample_payload() -> CompletionPayload {
    let wire = json!({
        "checkinId": "CHK-TEST-XYZ789",
        "installerData": {
            "name": "Jordan Reyes",
            "email": "jordan@acmebaths.com",
            "phone": "+15551234567",
            "company": "Acme Baths"
        },
        "projectData": {
            "name": "Tub-to-shower conversion",
            "description": "Full demo and rebuild",
            "client": "R. Alvarez"
        },
        "checklistData": {
            "1": { "completed": true },
            "2": { "completed": true },
            "3": { "completed": false }
        }
    });
    serde_json::from_value(wire).expect("payload matches the wire contract")
}

#[test]
fn payload_accepts_camel_case_wire_names() {
    let payload = sample_payload();
    assert_eq!(payload.checkin_id, "CHK-TEST-XYZ789");
    assert_eq!(payload.installer_data.company, "Acme Baths");
    assert_eq!(payload.checklist_data.len(), 3);
    assert!(payload.checklist_data["1"].completed);
}

#[test]
fn stats_count_completed_over_items_present() {
    let stats = completion_stats(&sample_payload());
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.percent, 67);
}

#[test]
fn subject_names_the_project() {
    assert_eq!(
        subject(&sample_payload()),
        "Installation Completed - Tub-to-shower conversion"
    );
}

#[test]
fn rendered_email_contains_summary_and_item_names() {
    let html = completion_email(&sample_payload());
    assert!(html.contains("Installation Completed Successfully"));
    assert!(html.contains("Tub-to-shower conversion"));
    assert!(html.contains("R. Alvarez"));
    assert!(html.contains("Jordan Reyes (Acme Baths)"));
    assert!(html.contains("CHK-TEST-XYZ789"));
    assert!(html.contains("2 of 3 items completed (67%)"));
    // completed items are listed by catalog name; incomplete ones are not
    assert!(html.contains("Check materials in the warehouse"));
    assert!(html.contains("Scan QR code"));
    assert!(!html.contains("Record checking materials with the client"));
}

#[test]
fn recipient_falls_back_to_admin_address() {
    let mut payload = sample_payload();
    assert_eq!(
        recipient_for(&payload, "admin@company.com"),
        "jordan@acmebaths.com"
    );
    payload.installer_data.email = "  ".into();
    assert_eq!(recipient_for(&payload, "admin@company.com"), "admin@company.com");
}

#[test]
fn unknown_item_ids_render_as_their_id() {
    let mut payload = sample_payload();
    payload.checklist_data.insert(
        "99".into(),
        ItemState {
            completed: true,
            ..Default::default()
        },
    );
    let html = completion_email(&payload);
    assert!(html.contains("<li>&#9989; 99</li>"));
}

fn setup_app(mailer: RecordingMailer) -> (axum::Router, Arc<RecordingMailer>) {
    let mailer = Arc::new(mailer);
    let state = NotifyState::new(
        mailer.clone(),
        "noreply@company.com".into(),
        "admin@company.com".into(),
    );
    (build_router(state), mailer)
}

fn post_payload(payload: &CompletionPayload) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/functions/send-completion-email")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(payload).unwrap()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn function_sends_email_and_reports_success() {
    let (app, mailer) = setup_app(RecordingMailer::default());
    let response = app.oneshot(post_payload(&sample_payload())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);

    let sent = mailer.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, "noreply@company.com");
    assert_eq!(sent[0].to, "jordan@acmebaths.com");
    assert!(sent[0].subject.contains("Tub-to-shower conversion"));
}

#[tokio::test]
async fn function_reports_delivery_failure() {
    let (app, mailer) = setup_app(RecordingMailer {
        fail: true,
        ..Default::default()
    });
    let response = app.oneshot(post_payload(&sample_payload())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("relay timeout"));
    assert_eq!(mailer.sent.lock().await.len(), 1);
}

#[tokio::test]
async fn health_endpoint_reports_module() {
    let (app, _mailer) = setup_app(RecordingMailer::default());
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["module"], "checkin-notify");
}
