// File: services/studylink_backend/src/main.rs
mod app_state;

use app_state::AppState;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use studylink_common::{CoreError, HttpStatusCode};
use studylink_config::load_config;
use studylink_messages::routes as messages_routes;
use studylink_notifications::routes as notifications_routes;
use studylink_realtime::routes as realtime_routes;
use studylink_sessions::routes as sessions_routes;
use studylink_sessions::scheduler::ReminderScheduler;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[axum::debug_handler]
async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if state.store.is_healthy().await {
        Ok(Json(json!({ "status": "ok" })))
    } else {
        let err = CoreError::TransientStoreFailure("store unreachable".to_string());
        Err((err.status_code(), err.to_string()))
    }
}

#[tokio::main]
async fn main() {
    studylink_common::logging::init();
    let config = Arc::new(load_config().expect("Failed to load config"));

    let state = Arc::new(
        AppState::new(config.clone())
            .await
            .expect("Failed to initialize application state"),
    );

    // The reminder scheduler shares the same store and gateway as the
    // request handlers; it runs for the lifetime of the process.
    let scheduler = Arc::new(ReminderScheduler::new(
        state.store.clone(),
        state.gateway.clone(),
        config.reminder.clone(),
    ));
    scheduler.spawn();

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the StudyLink API!" }))
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .merge(notifications_routes::routes(
            state.notifications_state.clone(),
        ))
        .merge(messages_routes::routes(state.messaging_state.clone()))
        .merge(sessions_routes::routes(state.sessions_state.clone()));

    // Live channels attach at the root, outside the /api prefix.
    let app = Router::new()
        .nest("/api", api_router)
        .merge(realtime_routes::routes(state.realtime_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
