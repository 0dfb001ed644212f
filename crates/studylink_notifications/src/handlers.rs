// --- File: crates/studylink_notifications/src/handlers.rs ---
use crate::logic::{list_notifications, mark_notification_read, NotificationError};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use studylink_common::auth::require_user;
use studylink_common::HttpStatusCode;
use studylink_config::AppConfig;
use studylink_db::models::Notification;
use studylink_db::Store;
use studylink_realtime::RealtimeGateway;

// State for notification handlers
#[derive(Clone)]
pub struct NotificationsState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub gateway: RealtimeGateway,
}

impl HttpStatusCode for NotificationError {
    fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::NotFound(_) => StatusCode::NOT_FOUND,
            NotificationError::Forbidden => StatusCode::FORBIDDEN,
            NotificationError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            NotificationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn map_error(err: NotificationError) -> (StatusCode, String) {
    (err.status_code(), err.to_string())
}

#[axum::debug_handler]
pub async fn list_notifications_handler(
    State(state): State<Arc<NotificationsState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, (StatusCode, String)> {
    let user_id = require_user(&headers, &state.config.auth)?;
    list_notifications(&state.store, &user_id)
        .await
        .map(Json)
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn mark_notification_read_handler(
    State(state): State<Arc<NotificationsState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let user_id = require_user(&headers, &state.config.auth)?;
    mark_notification_read(&state.store, &id, &user_id)
        .await
        .map(|_| Json(json!({ "message": "Notification marked as read" })))
        .map_err(map_error)
}
