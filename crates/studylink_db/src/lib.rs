// --- File: crates/studylink_db/src/lib.rs ---
//! Persistence store for StudyLink.
//!
//! Durable records for users, messages, notifications and study
//! sessions, behind a single [`Store`] handle. The store provides
//! per-record atomicity only; multi-record effects (bulk mark-read,
//! reminder fan-out) are best-effort by design.

pub mod client;
pub mod error;
pub mod models;

mod messages;
mod notifications;
mod schema;
mod sessions;
mod users;

pub use client::Store;
pub use error::DbError;
