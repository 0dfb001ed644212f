// --- File: crates/studylink_db/src/models.rs ---
//! Domain records persisted by the store. Field names serialize in
//! camelCase, matching what the web client consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A subject a user can study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
}

/// Identity anchor. Created at signup, mutated by profile edits, never
/// hard-deleted (messages/notifications/sessions reference it).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub university: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub subjects: Vec<Subject>,
    pub availability: Vec<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str, password_hash: &str, university: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            university: university.to_string(),
            bio: None,
            location: None,
            subjects: Vec::new(),
            availability: Vec::new(),
            avatar: None,
            created_at: Utc::now(),
        }
    }
}

/// An attached file reference on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub url: String,
    pub name: Option<String>,
    pub mime_type: Option<String>,
}

/// A directed chat communication. The sender owns edit/delete rights;
/// the recipient owns the read-flag transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub body: Option<String>,
    pub file: Option<FileRef>,
    pub read: bool,
    pub edited: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        sender_id: &str,
        recipient_id: &str,
        body: Option<String>,
        file: Option<FileRef>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            body,
            file,
            read: false,
            edited: false,
            created_at: Utc::now(),
        }
    }
}

/// The type of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Message,
    Request,
    Match,
    Session,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Message => "message",
            NotificationKind::Request => "request",
            NotificationKind::Match => "match",
            NotificationKind::Session => "session",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "message" => Some(NotificationKind::Message),
            "request" => Some(NotificationKind::Request),
            "match" => Some(NotificationKind::Match),
            "session" => Some(NotificationKind::Session),
            _ => None,
        }
    }
}

/// A directed, typed, one-shot alert. Mutated only by the owning user
/// flipping `read`; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub related_user_id: Option<String>,
    pub session_id: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: &str,
        kind: NotificationKind,
        message: &str,
        related_user_id: Option<String>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            message: message.to_string(),
            related_user_id,
            session_id,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// A scheduled study session. `reminder_sent` transitions false -> true
/// exactly once; it gates the reminder scheduler and never resets, even
/// when the session is edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub participants: Vec<String>,
    pub created_by: String,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
}

impl StudySession {
    pub fn new(
        title: &str,
        created_by: &str,
        participants: Vec<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: None,
            start_time,
            end_time,
            location: None,
            participants,
            created_by: created_by.to_string(),
            reminder_sent: false,
            created_at: Utc::now(),
        }
    }
}

/// One entry of the derived unread-count view: how many unread messages
/// a recipient has from one sender. Computed fresh each call; never a
/// stored counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub sender_id: String,
    pub sender_name: String,
    pub count: i64,
}

/// Latest message per sender, for the conversation overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub sender_id: String,
    pub sender_name: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Timestamps are persisted as unix milliseconds: the `Any` driver only
/// moves ints, floats, strings and bools between backends.
pub(crate) fn to_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}
