// --- File: crates/studylink_messages/src/logic.rs ---

use crate::models::SendMessageRequest;
use studylink_db::models::{ConversationSummary, Message, NotificationKind, UnreadCount};
use studylink_db::{DbError, Store};
use studylink_notifications::logic::{create_notification, NewNotification, NotificationError};
use studylink_realtime::RealtimeGateway;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Invalid message: {0}")]
    InvalidArgument(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Message not found: {0}")]
    MessageNotFound(String),
    #[error("Only the sender may modify this message")]
    Forbidden,
    #[error("Store temporarily unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Store error: {0}")]
    Store(String),
}

impl From<DbError> for MessagingError {
    fn from(err: DbError) -> Self {
        if err.is_transient() {
            MessagingError::StoreUnavailable(err.to_string())
        } else {
            MessagingError::Store(err.to_string())
        }
    }
}

impl From<NotificationError> for MessagingError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::StoreUnavailable(msg) => MessagingError::StoreUnavailable(msg),
            other => MessagingError::Store(other.to_string()),
        }
    }
}

/// Send a direct message.
///
/// Order of effects: persist the message, create the companion
/// "message" notification (which is itself persisted before being
/// pushed), done. The live push is a convenience; the recipient with
/// zero channels still sees the message on the next fetch.
pub async fn send_message_logic(
    store: &Store,
    gateway: &RealtimeGateway,
    sender_id: &str,
    request: SendMessageRequest,
) -> Result<Message, MessagingError> {
    let body = request
        .body
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string);
    if body.is_none() && request.file.is_none() {
        return Err(MessagingError::InvalidArgument(
            "message needs a body or a file attachment".to_string(),
        ));
    }

    let sender = store
        .find_user(sender_id)
        .await?
        .ok_or_else(|| MessagingError::UserNotFound(sender_id.to_string()))?;
    if store.find_user(&request.recipient_id).await?.is_none() {
        return Err(MessagingError::UserNotFound(request.recipient_id.clone()));
    }

    let message = Message::new(sender_id, &request.recipient_id, body, request.file);
    store.insert_message(&message).await?;
    debug!(
        "message {} persisted, sender {} -> recipient {}",
        message.id, message.sender_id, message.recipient_id
    );

    create_notification(
        store,
        gateway,
        NewNotification {
            user_id: request.recipient_id.clone(),
            kind: NotificationKind::Message,
            message: format!("You have a new message from {}", sender.name),
            related_user_id: Some(sender_id.to_string()),
            session_id: None,
        },
    )
    .await?;

    Ok(message)
}

/// Fetch the thread between the reader and another user, marking the
/// reader's inbound messages read first so the returned records match
/// the durable state.
pub async fn fetch_thread_logic(
    store: &Store,
    reader_id: &str,
    other_user_id: &str,
) -> Result<Vec<Message>, MessagingError> {
    store.mark_thread_read(reader_id, other_user_id).await?;
    Ok(store.thread_between(reader_id, other_user_id).await?)
}

/// Bulk mark-read for one thread. Idempotent; returns how many
/// messages actually flipped.
pub async fn mark_thread_read_logic(
    store: &Store,
    reader_id: &str,
    other_user_id: &str,
) -> Result<u64, MessagingError> {
    Ok(store.mark_thread_read(reader_id, other_user_id).await?)
}

/// Edit a message body. Sender-only.
pub async fn edit_message_logic(
    store: &Store,
    message_id: &str,
    requestor_id: &str,
    new_body: &str,
) -> Result<Message, MessagingError> {
    let message = store
        .find_message(message_id)
        .await?
        .ok_or_else(|| MessagingError::MessageNotFound(message_id.to_string()))?;
    if message.sender_id != requestor_id {
        return Err(MessagingError::Forbidden);
    }
    let body = new_body.trim();
    if body.is_empty() {
        return Err(MessagingError::InvalidArgument(
            "edited body must not be empty".to_string(),
        ));
    }
    store.update_message_body(message_id, body).await?;
    store
        .find_message(message_id)
        .await?
        .ok_or_else(|| MessagingError::MessageNotFound(message_id.to_string()))
}

/// Hard-delete a message. Sender-only.
pub async fn delete_message_logic(
    store: &Store,
    message_id: &str,
    requestor_id: &str,
) -> Result<(), MessagingError> {
    let message = store
        .find_message(message_id)
        .await?
        .ok_or_else(|| MessagingError::MessageNotFound(message_id.to_string()))?;
    if message.sender_id != requestor_id {
        return Err(MessagingError::Forbidden);
    }
    store.delete_message(message_id).await?;
    Ok(())
}

/// The derived unread-count view, computed fresh on every call.
pub async fn unread_counts_logic(
    store: &Store,
    user_id: &str,
) -> Result<Vec<UnreadCount>, MessagingError> {
    Ok(store.unread_counts(user_id).await?)
}

/// Latest inbound message per sender, newest first.
pub async fn recent_conversations_logic(
    store: &Store,
    user_id: &str,
) -> Result<Vec<ConversationSummary>, MessagingError> {
    Ok(store.recent_conversations(user_id).await?)
}
