// --- File: crates/studylink_realtime/src/routes.rs ---
use crate::handlers::{ws_handler, RealtimeState};
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn routes(state: Arc<RealtimeState>) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}
