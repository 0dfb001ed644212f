// --- File: crates/studylink_messages/src/handlers.rs ---
use crate::logic::{
    delete_message_logic, edit_message_logic, fetch_thread_logic, mark_thread_read_logic,
    recent_conversations_logic, send_message_logic, unread_counts_logic, MessagingError,
};
use crate::models::{EditMessageRequest, SendMessageRequest};
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
use studylink_db::models::{ConversationSummary, Message, UnreadCount};
use studylink_db::Store;
use studylink_realtime::RealtimeGateway;

// State for messaging handlers
#[derive(Clone)]
pub struct MessagingState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub gateway: RealtimeGateway,
}

impl HttpStatusCode for MessagingError {
    fn status_code(&self) -> StatusCode {
        match self {
            MessagingError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            MessagingError::UserNotFound(_) | MessagingError::MessageNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            MessagingError::Forbidden => StatusCode::FORBIDDEN,
            MessagingError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            MessagingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn map_error(err: MessagingError) -> (StatusCode, String) {
    (err.status_code(), err.to_string())
}

#[axum::debug_handler]
pub async fn send_message_handler(
    State(state): State<Arc<MessagingState>>,
    headers: HeaderMap,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), (StatusCode, String)> {
    let sender_id = require_user(&headers, &state.config.auth)?;
    send_message_logic(&state.store, &state.gateway, &sender_id, payload)
        .await
        .map(|message| (StatusCode::CREATED, Json(message)))
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn thread_handler(
    State(state): State<Arc<MessagingState>>,
    headers: HeaderMap,
    Path(other_user_id): Path<String>,
) -> Result<Json<Vec<Message>>, (StatusCode, String)> {
    let reader_id = require_user(&headers, &state.config.auth)?;
    fetch_thread_logic(&state.store, &reader_id, &other_user_id)
        .await
        .map(Json)
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn mark_thread_read_handler(
    State(state): State<Arc<MessagingState>>,
    headers: HeaderMap,
    Path(other_user_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let reader_id = require_user(&headers, &state.config.auth)?;
    mark_thread_read_logic(&state.store, &reader_id, &other_user_id)
        .await
        .map(|updated| Json(json!({ "updated": updated })))
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn edit_message_handler(
    State(state): State<Arc<MessagingState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<EditMessageRequest>,
) -> Result<Json<Message>, (StatusCode, String)> {
    let requestor_id = require_user(&headers, &state.config.auth)?;
    edit_message_logic(&state.store, &id, &requestor_id, &payload.body)
        .await
        .map(Json)
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn delete_message_handler(
    State(state): State<Arc<MessagingState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let requestor_id = require_user(&headers, &state.config.auth)?;
    delete_message_logic(&state.store, &id, &requestor_id)
        .await
        .map(|_| Json(json!({ "message": "Message deleted" })))
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn unread_counts_handler(
    State(state): State<Arc<MessagingState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UnreadCount>>, (StatusCode, String)> {
    let user_id = require_user(&headers, &state.config.auth)?;
    unread_counts_logic(&state.store, &user_id)
        .await
        .map(Json)
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn recent_conversations_handler(
    State(state): State<Arc<MessagingState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ConversationSummary>>, (StatusCode, String)> {
    let user_id = require_user(&headers, &state.config.auth)?;
    recent_conversations_logic(&state.store, &user_id)
        .await
        .map(Json)
        .map_err(map_error)
}
