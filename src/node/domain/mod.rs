//! Domain model for node-agent task tracking.
//!
//! The domain covers task identity, resource profiles, port assignments,
//! status payloads reported by the cluster manager and the snapshot unit
//! persisted across restarts. Infrastructure concerns stay outside this
//! boundary.

mod error;
mod ids;
mod profile;
mod snapshot;
mod task;

pub use error::{NodeDomainError, ParseTaskStateError};
pub use ids::{FrameworkId, TaskId};
pub use profile::{NodePorts, Profile};
pub use snapshot::Snapshot;
pub use task::{NodeDescriptor, NodeTask, TaskState, TaskStatus};
