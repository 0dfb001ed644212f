// --- File: crates/studylink_sessions/src/lib.rs ---
// Declare modules within this crate
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod models;
pub mod routes;
pub mod scheduler;
#[cfg(test)]
mod scheduler_test;
