// --- File: crates/studylink_realtime/src/handlers.rs ---
//! WebSocket channel establishment and the per-channel event loop.
//!
//! Per-channel lifecycle: Connecting -> Authenticated -> Active -> Closed.
//! A handshake with a missing/invalid/expired credential goes straight
//! to Closed (connection refused with an explicit reason); it never
//! reaches the registry.

use crate::events::PushFrame;
use crate::gateway::RealtimeGateway;
use crate::registry::ConnectionRegistry;
use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use studylink_common::auth::{verify_token, AuthError};
use studylink_config::{AppConfig, AuthConfig};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// State for the realtime routes.
#[derive(Clone)]
pub struct RealtimeState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<ConnectionRegistry>,
    pub gateway: RealtimeGateway,
}

#[derive(Deserialize, Debug)]
pub struct WsAuthQuery {
    /// Bearer credential supplied with the handshake, out-of-band of the
    /// socket protocol itself.
    pub token: Option<String>,
}

/// Frames a client may send on an open channel.
#[derive(Debug, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
enum ClientFrame {
    /// Optimistic relay hint for an open chat view; the durable write
    /// goes through the message API, not this frame.
    SendMessage {
        recipient_id: String,
        message: String,
    },
    Typing {
        recipient_id: String,
    },
    StopTyping {
        recipient_id: String,
    },
}

/// Authenticate a handshake credential, returning the subject user id.
/// Runs synchronously before the upgrade is accepted.
pub(crate) fn authenticate_handshake(
    token: Option<&str>,
    auth: &AuthConfig,
) -> Result<String, AuthError> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;
    verify_token(token, &auth.jwt_secret).map(|claims| claims.sub)
}

#[axum::debug_handler]
pub async fn ws_handler(
    State(state): State<Arc<RealtimeState>>,
    Query(query): Query<WsAuthQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let user_id = match authenticate_handshake(query.token.as_deref(), &state.config.auth) {
        Ok(user_id) => user_id,
        Err(reason) => {
            warn!("channel handshake refused: {}", reason);
            return (StatusCode::UNAUTHORIZED, reason.to_string()).into_response();
        }
    };
    ws.on_upgrade(move |socket| channel_loop(state, user_id, socket))
}

/// Drives one Active channel until it closes, then deregisters it.
async fn channel_loop(state: Arc<RealtimeState>, user_id: String, socket: WebSocket) {
    let (tx, mut rx) = mpsc::unbounded_channel::<PushFrame>();
    let channel_id = state.registry.register(&user_id, tx);
    info!("channel {} active for user {}", channel_id, user_id);

    let (mut sink, mut stream) = socket.split();
    let heartbeat_period = Duration::from_secs(state.config.realtime.heartbeat_secs.max(1));
    let mut heartbeat = tokio::time::interval(heartbeat_period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            // Outbound: frames published to this user.
            frame = rx.recv() => {
                match frame {
                    Some(frame) => {
                        if sink.send(WsMessage::Text(frame.to_text().into())).await.is_err() {
                            debug!("channel {} write failed, closing", channel_id);
                            break;
                        }
                    }
                    None => break,
                }
            }
            // Inbound: client frames and socket lifecycle.
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(WsMessage::Text(text))) => {
                        last_seen = Instant::now();
                        handle_client_frame(&state.gateway, &user_id, text.as_str());
                    }
                    Some(Ok(WsMessage::Pong(_))) | Some(Ok(WsMessage::Ping(_))) => {
                        last_seen = Instant::now();
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        debug!("channel {} closed by peer", channel_id);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!("channel {} read error: {}", channel_id, e);
                        break;
                    }
                }
            }
            // Heartbeat: ping, and drop channels that went silent.
            _ = heartbeat.tick() => {
                if last_seen.elapsed() > heartbeat_period * 2 {
                    debug!("channel {} heartbeat timeout", channel_id);
                    break;
                }
                if sink.send(WsMessage::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.registry.deregister(&user_id, channel_id);
    info!("channel {} closed for user {}", channel_id, user_id);
}

/// React to a client frame. The sender identity is always the
/// authenticated channel owner, never taken from the frame body.
fn handle_client_frame(gateway: &RealtimeGateway, sender_id: &str, raw: &str) {
    let frame: ClientFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(_) => {
            trace!("ignoring unrecognized client frame from {}", sender_id);
            return;
        }
    };
    match frame {
        ClientFrame::SendMessage {
            recipient_id,
            message,
        } => {
            gateway.publish(&recipient_id, PushFrame::receive_message(sender_id, &message));
        }
        ClientFrame::Typing { recipient_id } => {
            gateway.publish(&recipient_id, PushFrame::typing(sender_id));
        }
        ClientFrame::StopTyping { recipient_id } => {
            gateway.publish(&recipient_id, PushFrame::stop_typing(sender_id));
        }
    }
}
