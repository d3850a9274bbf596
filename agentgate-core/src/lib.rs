//! # agentgate Core Library
//!
//! This crate contains the task-oriented execution pipeline shared by the
//! agentgate gateway: the task data model and state machine, the per-task
//! event queue, the task updater that enforces lifecycle invariants, the
//! task store, and the agent-executor extension point.
//!
//! ## Module Organization
//!
//! - `models`: task record, state machine, messages, artifacts, agent card
//! - `store`: task store contract and in-memory implementation
//! - `events`: per-task ordered event queue with explicit termination
//! - `updater`: single-writer task updater
//! - `executor`: agent executor trait and the echo sample

pub mod events;
pub mod executor;
pub mod models;
pub mod store;
pub mod updater;

/// Current version of the agentgate core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
