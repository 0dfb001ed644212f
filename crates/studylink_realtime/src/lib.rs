// --- File: crates/studylink_realtime/src/lib.rs ---
// Declare modules within this crate
pub mod events;
pub mod gateway;
#[cfg(test)]
mod gateway_test;
pub mod handlers;
pub mod registry;
pub mod routes;

pub use events::PushFrame;
pub use gateway::RealtimeGateway;
pub use registry::{ChannelId, ConnectionRegistry};
