// --- File: crates/studylink_notifications/src/routes.rs ---
use crate::handlers::{
    list_notifications_handler, mark_notification_read_handler, NotificationsState,
};
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

pub fn routes(state: Arc<NotificationsState>) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications_handler))
        .route("/notifications/{id}/read", put(mark_notification_read_handler))
        .with_state(state)
}
