//! Shared world state for node lifecycle BDD scenarios.

use std::sync::Arc;

use corral::node::{
    adapters::InMemoryGateway,
    domain::{NodeDescriptor, NodePorts, Profile, TaskId},
    services::SchedulerState,
};
use rstest::fixture;

/// Scenario world for node lifecycle behaviour tests.
pub struct NodeLifecycleWorld {
    pub gateway: InMemoryGateway,
    pub state: Option<SchedulerState>,
    pub task_ids: Vec<TaskId>,
}

impl NodeLifecycleWorld {
    /// Creates a world with an empty snapshot store and no state yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gateway: InMemoryGateway::new(),
            state: None,
            task_ids: Vec::new(),
        }
    }

    /// Returns the scheduler state under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no scenario step has built the state yet.
    pub fn state(&self) -> Result<&SchedulerState, eyre::Report> {
        self.state
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing scheduler state in scenario world"))
    }

    /// Returns the first task registered in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been registered.
    pub fn first_task(&self) -> Result<&TaskId, eyre::Report> {
        self.task_ids
            .first()
            .ok_or_else(|| eyre::eyre!("missing registered task in scenario world"))
    }

    /// Builds a scheduler state from whatever the store holds.
    pub fn load_state(&mut self) {
        let gateway = Arc::new(self.gateway.clone());
        self.state = Some(run_async(
            SchedulerState::builder().with_gateway(gateway).load(),
        ));
    }
}

impl Default for NodeLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> NodeLifecycleWorld {
    NodeLifecycleWorld::default()
}

/// Builds a descriptor for one node of `profile`.
///
/// # Errors
///
/// Returns an error when `profile` is blank.
pub fn descriptor(profile: &str) -> Result<NodeDescriptor, eyre::Report> {
    Ok(NodeDescriptor::new(
        Profile::new(profile, 2, 4096)?,
        NodePorts::new().with_port("address", 31_000),
    ))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
