// --- File: crates/studylink_sessions/src/handlers.rs ---
use crate::logic::{
    create_session_logic, delete_session_logic, list_sessions_logic, update_session_logic,
    upcoming_sessions_logic, SessionError,
};
use crate::models::{CreateSessionRequest, UpdateSessionRequest};
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
use studylink_db::models::StudySession;
use studylink_db::Store;
use studylink_realtime::RealtimeGateway;

// State for session handlers
#[derive(Clone)]
pub struct SessionsState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub gateway: RealtimeGateway,
}

impl HttpStatusCode for SessionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SessionError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            SessionError::UserNotFound(_) | SessionError::SessionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            SessionError::Forbidden => StatusCode::FORBIDDEN,
            SessionError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SessionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn map_error(err: SessionError) -> (StatusCode, String) {
    (err.status_code(), err.to_string())
}

#[axum::debug_handler]
pub async fn create_session_handler(
    State(state): State<Arc<SessionsState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<StudySession>), (StatusCode, String)> {
    let creator_id = require_user(&headers, &state.config.auth)?;
    create_session_logic(&state.store, &state.gateway, &creator_id, payload)
        .await
        .map(|session| (StatusCode::CREATED, Json(session)))
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn list_sessions_handler(
    State(state): State<Arc<SessionsState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<StudySession>>, (StatusCode, String)> {
    let user_id = require_user(&headers, &state.config.auth)?;
    list_sessions_logic(&state.store, &user_id)
        .await
        .map(Json)
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn upcoming_sessions_handler(
    State(state): State<Arc<SessionsState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<StudySession>>, (StatusCode, String)> {
    let user_id = require_user(&headers, &state.config.auth)?;
    upcoming_sessions_logic(&state.store, &user_id)
        .await
        .map(Json)
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn update_session_handler(
    State(state): State<Arc<SessionsState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSessionRequest>,
) -> Result<Json<StudySession>, (StatusCode, String)> {
    let requestor_id = require_user(&headers, &state.config.auth)?;
    update_session_logic(&state.store, &id, &requestor_id, payload)
        .await
        .map(Json)
        .map_err(map_error)
}

#[axum::debug_handler]
pub async fn delete_session_handler(
    State(state): State<Arc<SessionsState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let requestor_id = require_user(&headers, &state.config.auth)?;
    delete_session_logic(&state.store, &id, &requestor_id)
        .await
        .map(|_| Json(json!({ "message": "Session deleted" })))
        .map_err(map_error)
}
