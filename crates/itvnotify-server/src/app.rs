use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with the control surface attached.
///
/// `TraceLayer` gives structured request/response logging via `tracing`. The
/// surface is deliberately tiny: trigger an ad-hoc pass, answer liveness.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home::home))
        .route("/send_email", get(routes::send::send_email))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
