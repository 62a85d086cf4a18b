//! Application services for node task state orchestration.

pub mod index;
pub mod registry;
mod scheduler;
mod writer;

pub use index::StatusIndex;
pub use registry::TaskRegistry;
pub use scheduler::{SchedulerState, SchedulerStateBuilder};
