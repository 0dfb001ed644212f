// --- File: crates/studylink_realtime/src/gateway.rs ---

use crate::events::PushFrame;
use crate::registry::ConnectionRegistry;
use std::sync::Arc;
use tracing::{trace, warn};

/// The publish side of the realtime layer.
///
/// `publish` is an explicit message-passing contract with best-effort
/// semantics: the durable record (message/notification row) is the
/// source of truth, the live push is purely a latency optimization.
#[derive(Debug, Clone)]
pub struct RealtimeGateway {
    registry: Arc<ConnectionRegistry>,
}

impl RealtimeGateway {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Push a frame to every live channel of `user_id`.
    ///
    /// Fire-and-forget: a failure on one channel does not prevent
    /// delivery to the user's other channels and never surfaces to the
    /// caller. Zero registered channels is a no-op — the recipient will
    /// see the durable record on their next fetch. Returns the number
    /// of channels the frame was handed to, for logging only.
    pub fn publish(&self, user_id: &str, frame: PushFrame) -> usize {
        let channels = self.registry.channels_for(user_id);
        if channels.is_empty() {
            trace!("no live channels for user {}, skipping push", user_id);
            return 0;
        }
        let mut delivered = 0;
        for (channel_id, sender) in channels {
            match sender.send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    // Channel is shutting down; its loop deregisters it.
                    warn!(
                        "push '{}' to channel {} of user {} failed",
                        frame.event, channel_id, user_id
                    );
                }
            }
        }
        trace!(
            "pushed '{}' to {} channel(s) of user {}",
            frame.event,
            delivered,
            user_id
        );
        delivered
    }
}
