//! Orchestrator Migrate Library
//!
//! Copies orchestrations from a source project into an empty destination
//! project, rewriting tasks that run other orchestrations so they point at
//! the migrated copies. The binary is in `src/main.rs`.

pub mod app;
pub mod client;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod migration;
pub mod model;
/// Orchestration store trait and the in-memory store
pub mod store;
