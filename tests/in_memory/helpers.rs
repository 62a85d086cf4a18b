//! Shared test helpers for in-memory scheduler state integration tests.

use std::sync::Arc;

use corral::node::{
    adapters::InMemoryGateway,
    domain::{NodeDescriptor, NodePorts, Profile, TaskId, TaskState},
    services::SchedulerState,
};
use rstest::fixture;

/// Provides an empty in-memory snapshot store for each test.
#[fixture]
pub fn gateway() -> InMemoryGateway {
    InMemoryGateway::new()
}

/// Builds a node descriptor for `profile_name` with the standard node
/// manager ports.
///
/// # Panics
///
/// Panics if `profile_name` is blank.
#[must_use]
pub fn descriptor(profile_name: &str) -> NodeDescriptor {
    let profile = Profile::new(profile_name, 2, 4096).expect("valid profile");
    let ports = NodePorts::new()
        .with_port("address", 31_000)
        .with_port("localizer.address", 31_001)
        .with_port("webapp.address", 31_002)
        .with_port("shuffle.port", 31_003);
    NodeDescriptor::new(profile, ports)
}

/// Builds a scheduler state persisting into `gateway`.
pub async fn scheduler(gateway: &InMemoryGateway) -> SchedulerState {
    SchedulerState::builder()
        .with_gateway(Arc::new(gateway.clone()))
        .load()
        .await
}

/// Returns every phase whose membership includes `id`.
#[must_use]
pub fn phases_containing(state: &SchedulerState, id: &TaskId) -> Vec<TaskState> {
    TaskState::ALL
        .into_iter()
        .filter(|phase| state.task_ids(*phase).contains(id))
        .collect()
}
