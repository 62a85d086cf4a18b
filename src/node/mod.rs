//! Node-agent task lifecycle tracking for the scheduler.
//!
//! This module keeps the scheduler's view of every node-agent task it has
//! launched or intends to launch: the task record itself, the lifecycle
//! phase the task is in, and the framework registration of the scheduler.
//! Every mutation is followed by a best-effort snapshot to an optional
//! durable store so the state survives scheduler restarts. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
