//! Corral: durable task state for a node manager scheduler.
//!
//! The scheduler launches node manager processes on cluster hosts and must
//! know, for every one it has launched or intends to launch, which lifecycle
//! phase it is in. This crate keeps that bookkeeping consistent under
//! concurrent callbacks and durable across restarts.
//!
//! # Architecture
//!
//! Corral follows hexagonal architecture principles:
//!
//! - **Domain**: Identifiers, resource profiles, task records and snapshots
//! - **Ports**: The snapshot store and snapshot codec interfaces
//! - **Adapters**: In-memory and file stores, and the JSON codec
//! - **Services**: The task registry, the lifecycle index and the
//!   scheduler state that combines them
//!
//! # Modules
//!
//! - [`node`]: Task lifecycle tracking and snapshot persistence
//! - [`launch`]: Node manager launch command generation
//! - [`config`]: Scheduler configuration loading

pub mod config;
pub mod launch;
pub mod node;
