// --- File: crates/studylink_realtime/src/registry.rs ---
//! The connection registry: authenticated user id -> live channels.
//!
//! A user may hold any number of concurrent channels (tabs, devices);
//! all of them receive identical pushes. Entries are never persisted —
//! after a process restart every user is offline until they reconnect.

use crate::events::PushFrame;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

pub type ChannelId = Uuid;

/// Coarse-locked user->channels map. Registry operations are O(1) map
/// updates under low contention, so a single lock keeps the invariants
/// simple; correctness matters more than throughput here.
///
/// Constructed once at process start and injected wherever `publish`
/// is needed; never ambient global state.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    channels: Mutex<HashMap<String, HashMap<ChannelId, UnboundedSender<PushFrame>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a live channel for `user_id`, returning its handle.
    pub fn register(&self, user_id: &str, sender: UnboundedSender<PushFrame>) -> ChannelId {
        let channel_id = Uuid::new_v4();
        let mut channels = self.lock();
        channels
            .entry(user_id.to_string())
            .or_default()
            .insert(channel_id, sender);
        channel_id
    }

    /// Remove a channel. Called on every close path (network close,
    /// heartbeat timeout, send failure); never relies on the client
    /// signaling logout.
    pub fn deregister(&self, user_id: &str, channel_id: ChannelId) {
        let mut channels = self.lock();
        if let Some(user_channels) = channels.get_mut(user_id) {
            user_channels.remove(&channel_id);
            if user_channels.is_empty() {
                channels.remove(user_id);
            }
        }
    }

    /// Snapshot of the user's live channels. Cloned senders, so the
    /// caller pushes without holding the registry lock.
    pub fn channels_for(&self, user_id: &str) -> Vec<(ChannelId, UnboundedSender<PushFrame>)> {
        self.lock()
            .get(user_id)
            .map(|user_channels| {
                user_channels
                    .iter()
                    .map(|(id, sender)| (*id, sender.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        self.lock().contains_key(user_id)
    }

    pub fn connection_count(&self, user_id: &str) -> usize {
        self.lock().get(user_id).map_or(0, HashMap::len)
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<String, HashMap<ChannelId, UnboundedSender<PushFrame>>>>
    {
        // Nothing panics while holding this lock; recover anyway.
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn multiple_channels_per_user() {
        let registry = ConnectionRegistry::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        let c1 = registry.register("user-1", tx1);
        let c2 = registry.register("user-1", tx2);
        assert_ne!(c1, c2);
        assert_eq!(registry.connection_count("user-1"), 2);
        assert_eq!(registry.channels_for("user-1").len(), 2);
        assert!(registry.is_online("user-1"));
    }

    #[test]
    fn deregister_removes_channel_and_empty_entry() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let channel = registry.register("user-1", tx);

        registry.deregister("user-1", channel);
        assert!(!registry.is_online("user-1"));
        assert!(registry.channels_for("user-1").is_empty());

        // Deregistering twice is harmless.
        registry.deregister("user-1", channel);
        assert_eq!(registry.connection_count("user-1"), 0);
    }

    #[test]
    fn unknown_user_has_no_channels() {
        let registry = ConnectionRegistry::new();
        assert!(registry.channels_for("nobody").is_empty());
        assert!(!registry.is_online("nobody"));
    }
}
