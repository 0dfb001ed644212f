// --- File: crates/studylink_common/src/lib.rs ---
//! Shared building blocks for the StudyLink workspace: the error
//! taxonomy, logging initialization and bearer-token auth.

pub mod auth;
pub mod error;
pub mod logging;

pub use error::{CoreError, HttpStatusCode};
