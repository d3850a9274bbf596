//! # agentgate API Server Library
//!
//! This library provides the HTTP surface of the agentgate gateway:
//! tenant mounting, the request handler that drives agent executions,
//! and the Axum routes for message submission, streaming, task lookup
//! and cancellation.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `handler`: Request handler driving task executions
//! - `mounts`: Tenant mounts and the routing table
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod mounts;
pub mod routes;
