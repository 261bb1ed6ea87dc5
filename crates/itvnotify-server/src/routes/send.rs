use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::{error, info};

use crate::scheduler::pass::run_notification_pass;
use crate::state::AppState;

/// `GET /send_email` — ad-hoc notification pass.
///
/// Accepts immediately with `202` and runs the pass on its own task; nobody
/// waits synchronously for send outcomes, they go to the log only.
pub async fn send_email(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let state = Arc::clone(&state);
    tokio::spawn(async move {
        match run_notification_pass(&state).await {
            Ok(sent) => info!(sent, "ad-hoc notification pass completed"),
            Err(e) => error!(error = %e, "ad-hoc notification pass aborted"),
        }
    });
    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" })))
}
