//! Port contracts for scheduler state persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the scheduler
//! state service: a byte-blob store and a snapshot codec.

pub mod codec;
pub mod gateway;

pub use codec::SnapshotCodec;
pub use gateway::{PersistenceError, PersistenceGateway, PersistenceResult};
