//! checkin-web library - installer workflow HTTP service
//!
//! Hosts the intake form, checklist execution, finalize/print, and
//! dashboard endpoints on top of the shared lifecycle state machine.

use std::collections::HashMap;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use checkin_common::lifecycle::CheckinFlow;
use checkin_common::notify::Notifier;
use checkin_common::store::Store;

pub mod api;
pub mod notifier;

/// Application state shared across HTTP handlers
///
/// Live flows are kept behind one mutex: user actions are discrete and
/// run to completion before the next is processed, so no two
/// persistence calls for the same check-in are ever in flight at once.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub notifier: Arc<dyn Notifier>,
    pub sessions: Arc<Mutex<HashMap<String, CheckinFlow>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/checkins", post(api::create_checkin))
        .route("/api/checkins/:id/items/:item_id/toggle", post(api::toggle_item))
        .route("/api/checkins/:id/items/:item_id/notes", put(api::set_item_notes))
        .route("/api/checkins/:id/items/:item_id/photos", post(api::attach_photo))
        .route("/api/checkins/:id/items/:item_id/videos", post(api::attach_video))
        .route("/api/checkins/:id/items/:item_id/signature", post(api::capture_signature))
        .route("/api/checkins/:id/save", post(api::save_progress))
        .route("/api/checkins/:id/finalize", post(api::finalize_checkin))
        .route("/api/checkins/:id/progress", get(api::get_progress))
        .route("/api/checkins/:id/tags", get(api::get_tags))
        .route("/api/checklist-items", get(api::get_catalog))
        .route("/api/dashboard", get(api::get_dashboard))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
