// --- File: crates/studylink_notifications/src/logic.rs ---

use serde_json::{json, Value};
use studylink_db::models::{Notification, NotificationKind};
use studylink_db::{DbError, Store};
use studylink_realtime::{PushFrame, RealtimeGateway};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),
    #[error("Not authorized to modify this notification")]
    Forbidden,
    #[error("Store temporarily unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Store error: {0}")]
    Store(String),
}

impl From<DbError> for NotificationError {
    fn from(err: DbError) -> Self {
        if err.is_transient() {
            NotificationError::StoreUnavailable(err.to_string())
        } else {
            NotificationError::Store(err.to_string())
        }
    }
}

/// Input for creating a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub related_user_id: Option<String>,
    pub session_id: Option<String>,
}

/// Create a notification and push it live as a `newNotification` event.
pub async fn create_notification(
    store: &Store,
    gateway: &RealtimeGateway,
    new: NewNotification,
) -> Result<Notification, NotificationError> {
    persist_and_publish(store, gateway, new, PushFrame::new_notification).await
}

/// Create a session-reminder notification; pushed as `session_reminder`
/// so clients can surface it distinctly. Used by the reminder scheduler.
pub async fn create_reminder_notification(
    store: &Store,
    gateway: &RealtimeGateway,
    new: NewNotification,
) -> Result<Notification, NotificationError> {
    persist_and_publish(store, gateway, new, PushFrame::session_reminder).await
}

async fn persist_and_publish(
    store: &Store,
    gateway: &RealtimeGateway,
    new: NewNotification,
    wrap: fn(Value) -> PushFrame,
) -> Result<Notification, NotificationError> {
    let notification = Notification::new(
        &new.user_id,
        new.kind,
        &new.message,
        new.related_user_id,
        new.session_id,
    );

    // Durable write first. If it fails, the operation aborts here and
    // no push is ever attempted.
    store.insert_notification(&notification).await?;

    // Push is best-effort from this point on: the row exists, so a
    // failed name lookup or an offline target must not fail the create.
    let actor_name = match &notification.related_user_id {
        Some(id) => store.user_name(id).await.ok().flatten(),
        None => None,
    };
    let mut payload = serde_json::to_value(&notification).unwrap_or_default();
    if let Value::Object(map) = &mut payload {
        map.insert("relatedUserName".to_string(), json!(actor_name));
    }
    let delivered = gateway.publish(&notification.user_id, wrap(payload));
    debug!(
        "notification {} for user {} pushed to {} channel(s)",
        notification.id, notification.user_id, delivered
    );

    Ok(notification)
}

/// Flip a notification's read flag. Owner-only; idempotent.
pub async fn mark_notification_read(
    store: &Store,
    notification_id: &str,
    requestor_id: &str,
) -> Result<(), NotificationError> {
    let notification = store
        .find_notification(notification_id)
        .await?
        .ok_or_else(|| NotificationError::NotFound(notification_id.to_string()))?;
    if notification.user_id != requestor_id {
        return Err(NotificationError::Forbidden);
    }
    store.mark_notification_read(notification_id).await?;
    Ok(())
}

/// All notifications for a user, newest first. Finite and restartable;
/// the live stream layered on top reconciles against this on refetch.
pub async fn list_notifications(
    store: &Store,
    user_id: &str,
) -> Result<Vec<Notification>, NotificationError> {
    Ok(store.notifications_for(user_id).await?)
}
