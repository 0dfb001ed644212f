// --- File: crates/studylink_realtime/src/events.rs ---
//! The push event catalogue. Every frame a client can receive over a
//! live channel is one of these, serialized as `{"event": ..., "data": ...}`.

use serde::Serialize;
use serde_json::{json, Value};

/// Event names, as the web client knows them.
pub mod event {
    pub const NEW_NOTIFICATION: &str = "newNotification";
    pub const RECEIVE_MESSAGE: &str = "receiveMessage";
    pub const TYPING: &str = "typing";
    pub const STOP_TYPING: &str = "stopTyping";
    pub const SESSION_REMINDER: &str = "session_reminder";
}

/// A single push to a live channel: an event name plus a JSON payload.
/// Pushes are a latency shortcut, never a durability mechanism — the
/// persisted record is always written first.
#[derive(Debug, Clone, Serialize)]
pub struct PushFrame {
    pub event: String,
    pub data: Value,
}

impl PushFrame {
    pub fn new(event: &str, data: Value) -> Self {
        Self {
            event: event.to_string(),
            data,
        }
    }

    /// Full notification record, plus the denormalized actor name the
    /// caller already resolved.
    pub fn new_notification(payload: Value) -> Self {
        Self::new(event::NEW_NOTIFICATION, payload)
    }

    /// Reminder notifications get their own event name so clients can
    /// surface them more loudly than ordinary notifications.
    pub fn session_reminder(payload: Value) -> Self {
        Self::new(event::SESSION_REMINDER, payload)
    }

    /// Optimistic UI hint relayed between two open chat views. Not the
    /// durable record.
    pub fn receive_message(sender_id: &str, message: &str) -> Self {
        Self::new(
            event::RECEIVE_MESSAGE,
            json!({ "senderId": sender_id, "message": message }),
        )
    }

    pub fn typing(sender_id: &str) -> Self {
        Self::new(event::TYPING, json!({ "senderId": sender_id }))
    }

    pub fn stop_typing(sender_id: &str) -> Self {
        Self::new(event::STOP_TYPING, json!({ "senderId": sender_id }))
    }

    /// Wire form of the frame.
    pub fn to_text(&self) -> String {
        // Serializing a string + Value pair cannot fail in practice.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_serialize_with_event_tag() {
        let frame = PushFrame::receive_message("user-1", "hello");
        let text = frame.to_text();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["event"], "receiveMessage");
        assert_eq!(parsed["data"]["senderId"], "user-1");
        assert_eq!(parsed["data"]["message"], "hello");
    }
}
