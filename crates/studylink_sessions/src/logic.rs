// --- File: crates/studylink_sessions/src/logic.rs ---

use crate::models::{CreateSessionRequest, UpdateSessionRequest};
use studylink_db::models::{NotificationKind, StudySession};
use studylink_db::{DbError, Store};
use studylink_notifications::logic::{create_notification, NewNotification, NotificationError};
use studylink_realtime::RealtimeGateway;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session: {0}")]
    InvalidArgument(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Only the session creator may modify it")]
    Forbidden,
    #[error("Store temporarily unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Store error: {0}")]
    Store(String),
}

impl From<DbError> for SessionError {
    fn from(err: DbError) -> Self {
        if err.is_transient() {
            SessionError::StoreUnavailable(err.to_string())
        } else {
            SessionError::Store(err.to_string())
        }
    }
}

impl From<NotificationError> for SessionError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::StoreUnavailable(msg) => SessionError::StoreUnavailable(msg),
            other => SessionError::Store(other.to_string()),
        }
    }
}

fn validate_times(session: &StudySession) -> Result<(), SessionError> {
    if session.title.trim().is_empty() {
        return Err(SessionError::InvalidArgument(
            "session title must not be empty".to_string(),
        ));
    }
    if session.start_time >= session.end_time {
        return Err(SessionError::InvalidArgument(
            "session must end after it starts".to_string(),
        ));
    }
    Ok(())
}

/// Create a study session and invite everyone on it.
///
/// The creator is always a participant. Every listed participant must
/// exist; nobody gets half a session. Invites are ordinary
/// notifications (persist first, push best-effort), and the creator
/// does not get one for their own session.
pub async fn create_session_logic(
    store: &Store,
    gateway: &RealtimeGateway,
    creator_id: &str,
    request: CreateSessionRequest,
) -> Result<StudySession, SessionError> {
    let mut participants = request.participants;
    if !participants.iter().any(|p| p == creator_id) {
        participants.push(creator_id.to_string());
    }

    for participant in &participants {
        if store.find_user(participant).await?.is_none() {
            return Err(SessionError::UserNotFound(participant.clone()));
        }
    }

    let mut session = StudySession::new(
        request.title.trim(),
        creator_id,
        participants,
        request.start_time,
        request.end_time,
    );
    session.description = request.description;
    session.location = request.location;
    validate_times(&session)?;

    store.insert_session(&session).await?;
    debug!(
        "session {} created by {} with {} participant(s)",
        session.id,
        creator_id,
        session.participants.len()
    );

    for participant in &session.participants {
        if participant == creator_id {
            continue;
        }
        create_notification(
            store,
            gateway,
            NewNotification {
                user_id: participant.clone(),
                kind: NotificationKind::Session,
                message: format!(
                    "You've been invited to a study session: \"{}\"",
                    session.title
                ),
                related_user_id: Some(creator_id.to_string()),
                session_id: Some(session.id.clone()),
            },
        )
        .await?;
    }

    Ok(session)
}

/// Every session the user participates in, soonest first.
pub async fn list_sessions_logic(
    store: &Store,
    user_id: &str,
) -> Result<Vec<StudySession>, SessionError> {
    Ok(store.sessions_for_participant(user_id).await?)
}

/// Sessions starting within the next 24 hours.
pub async fn upcoming_sessions_logic(
    store: &Store,
    user_id: &str,
) -> Result<Vec<StudySession>, SessionError> {
    Ok(store
        .upcoming_sessions_for(user_id, chrono::Utc::now())
        .await?)
}

/// Apply a partial update. Creator-only. `reminder_sent` is never
/// touched: moving a session does not re-arm its reminder.
pub async fn update_session_logic(
    store: &Store,
    session_id: &str,
    requestor_id: &str,
    request: UpdateSessionRequest,
) -> Result<StudySession, SessionError> {
    let mut session = store
        .find_session(session_id)
        .await?
        .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;
    if session.created_by != requestor_id {
        return Err(SessionError::Forbidden);
    }

    if let Some(title) = request.title {
        session.title = title.trim().to_string();
    }
    if let Some(description) = request.description {
        session.description = Some(description);
    }
    if let Some(start_time) = request.start_time {
        session.start_time = start_time;
    }
    if let Some(end_time) = request.end_time {
        session.end_time = end_time;
    }
    if let Some(location) = request.location {
        session.location = Some(location);
    }
    if let Some(mut participants) = request.participants {
        if !participants.iter().any(|p| p == &session.created_by) {
            participants.push(session.created_by.clone());
        }
        for participant in &participants {
            if store.find_user(participant).await?.is_none() {
                return Err(SessionError::UserNotFound(participant.clone()));
            }
        }
        session.participants = participants;
    }
    validate_times(&session)?;

    let updated = store.update_session(&session).await?;
    if updated == 0 {
        warn!("session {} vanished during update", session_id);
        return Err(SessionError::SessionNotFound(session_id.to_string()));
    }
    store
        .find_session(session_id)
        .await?
        .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))
}

/// Hard-delete a session. Creator-only. Already-delivered invite and
/// reminder notifications stay behind.
pub async fn delete_session_logic(
    store: &Store,
    session_id: &str,
    requestor_id: &str,
) -> Result<(), SessionError> {
    let session = store
        .find_session(session_id)
        .await?
        .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;
    if session.created_by != requestor_id {
        return Err(SessionError::Forbidden);
    }
    store.delete_session(session_id).await?;
    Ok(())
}
