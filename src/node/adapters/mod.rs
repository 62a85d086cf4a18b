//! Adapter implementations for scheduler state persistence.

pub mod file;
pub mod json;
pub mod memory;

pub use file::FileGateway;
pub use json::JsonSnapshotCodec;
pub use memory::InMemoryGateway;
