// --- File: crates/studylink_sessions/src/routes.rs ---
use crate::handlers::{
    create_session_handler, delete_session_handler, list_sessions_handler,
    update_session_handler, upcoming_sessions_handler, SessionsState,
};
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

pub fn routes(state: Arc<SessionsState>) -> Router {
    Router::new()
        .route("/sessions", post(create_session_handler).get(list_sessions_handler))
        .route("/sessions/upcoming", get(upcoming_sessions_handler))
        .route(
            "/sessions/{id}",
            patch(update_session_handler).delete(delete_session_handler),
        )
        .with_state(state)
}
