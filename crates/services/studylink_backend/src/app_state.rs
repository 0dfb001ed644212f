// --- File: crates/services/studylink_backend/src/app_state.rs ---
use std::sync::Arc;
use studylink_config::AppConfig;
use studylink_db::{DbError, Store};
use studylink_messages::handlers::MessagingState;
use studylink_notifications::handlers::NotificationsState;
use studylink_realtime::handlers::RealtimeState;
use studylink_realtime::{ConnectionRegistry, RealtimeGateway};
use studylink_sessions::handlers::SessionsState;

/// Application state shared across all routes.
///
/// Built once at startup: a single store pool, a single connection
/// registry and one gateway over it, then one per-service state handed
/// to each router. Everything is injected; nothing is ambient.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub gateway: RealtimeGateway,
    pub realtime_state: Arc<RealtimeState>,
    pub notifications_state: Arc<NotificationsState>,
    pub messaging_state: Arc<MessagingState>,
    pub sessions_state: Arc<SessionsState>,
}

impl AppState {
    /// Connect the store, run migrations and wire up the service states.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, DbError> {
        let store = Store::connect(&config.database).await?;
        store.migrate().await?;

        let registry = Arc::new(ConnectionRegistry::new());
        let gateway = RealtimeGateway::new(registry.clone());

        let realtime_state = Arc::new(RealtimeState {
            config: config.clone(),
            registry,
            gateway: gateway.clone(),
        });
        let notifications_state = Arc::new(NotificationsState {
            config: config.clone(),
            store: store.clone(),
            gateway: gateway.clone(),
        });
        let messaging_state = Arc::new(MessagingState {
            config: config.clone(),
            store: store.clone(),
            gateway: gateway.clone(),
        });
        let sessions_state = Arc::new(SessionsState {
            config: config.clone(),
            store: store.clone(),
            gateway: gateway.clone(),
        });

        Ok(Self {
            config,
            store,
            gateway,
            realtime_state,
            notifications_state,
            messaging_state,
            sessions_state,
        })
    }
}
