//! Scheduler state: task records, lifecycle membership and framework
//! registration behind one lock, persisted after every mutation.

use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::{StatusIndex, TaskRegistry, writer::SnapshotWriter};
use crate::node::{
    adapters::JsonSnapshotCodec,
    domain::{FrameworkId, NodeDescriptor, NodeTask, Snapshot, TaskId, TaskState, TaskStatus},
    ports::{PersistenceGateway, SnapshotCodec},
};

/// State guarded by the scheduler lock.
#[derive(Debug, Default)]
struct StateInner {
    framework_id: Option<FrameworkId>,
    registry: TaskRegistry,
    index: StatusIndex,
    revision: u64,
}

impl StateInner {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut inner = Self {
            framework_id: snapshot.framework_id.clone(),
            ..Self::default()
        };
        for state in TaskState::ALL {
            for id in snapshot.members(state) {
                if let Some(previous) = inner.index.transition(id, state) {
                    warn!(
                        task_id = %id,
                        kept = state.as_str(),
                        dropped = previous.as_str(),
                        "task listed in more than one persisted state"
                    );
                }
            }
        }
        for (id, task) in snapshot.tasks {
            inner.registry.put(id, task);
        }
        inner
    }

    fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot {
            framework_id: self.framework_id.clone(),
            tasks: self
                .registry
                .iter()
                .map(|(id, task)| (id.clone(), task.clone()))
                .collect(),
            ..Snapshot::default()
        };
        for state in TaskState::ALL {
            snapshot
                .members_mut(state)
                .extend(self.index.iter_members(state).cloned());
        }
        snapshot
    }
}

/// Tracks every node task the scheduler manages and its lifecycle phase.
///
/// All mutations take one exclusive lock for the in-memory change only, so
/// each call is applied atomically with respect to every other call. The
/// snapshot that follows a mutation is stored after the lock is released;
/// a slow or failing store never delays other mutations and never rolls
/// back or fails the mutation that triggered it.
///
/// # Examples
///
/// ```
/// use corral::node::domain::{NodeDescriptor, NodePorts, Profile, TaskState};
/// use corral::node::services::SchedulerState;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let state = SchedulerState::builder().load().await;
/// let profile = Profile::new("medium", 2, 4096).expect("valid profile");
/// let ids = state
///     .add_nodes(vec![NodeDescriptor::new(profile, NodePorts::new())])
///     .await;
/// assert_eq!(state.task_state(&ids[0]), Some(TaskState::Pending));
/// # });
/// ```
pub struct SchedulerState<C = DefaultClock> {
    inner: Mutex<StateInner>,
    writer: Option<SnapshotWriter>,
    clock: C,
}

impl SchedulerState<DefaultClock> {
    /// Starts building a scheduler state with the system clock, the JSON
    /// codec and no persistence.
    #[must_use]
    pub fn builder() -> SchedulerStateBuilder<DefaultClock> {
        SchedulerStateBuilder {
            gateway: None,
            codec: Arc::new(JsonSnapshotCodec::new()),
            clock: DefaultClock,
        }
    }
}

impl<C> SchedulerState<C>
where
    C: Clock + Send + Sync,
{
    fn lock(&self) -> MutexGuard<'_, StateInner> {
        // Every critical section leaves the state consistent, so a panic
        // elsewhere while holding the lock does not invalidate it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `apply` under the lock, then persists the resulting state.
    async fn mutate<T>(&self, apply: impl FnOnce(&mut StateInner, DateTime<Utc>) -> T) -> T {
        let (result, pending) = {
            let mut inner = self.lock();
            let result = apply(&mut inner, self.clock.utc());
            inner.revision += 1;
            let pending = self
                .writer
                .as_ref()
                .map(|_| (inner.revision, inner.snapshot()));
            (result, pending)
        };
        if let (Some(writer), Some((revision, snapshot))) = (&self.writer, pending) {
            writer.write(revision, snapshot).await;
        }
        result
    }

    /// Registers one task per descriptor, each starting in
    /// [`TaskState::Pending`].
    ///
    /// Returns the freshly minted identifiers in descriptor order. An empty
    /// batch changes nothing and is not persisted.
    pub async fn add_nodes(&self, nodes: impl IntoIterator<Item = NodeDescriptor>) -> Vec<TaskId> {
        let descriptors: Vec<NodeDescriptor> = nodes.into_iter().collect();
        if descriptors.is_empty() {
            info!("no nodes to add");
            return Vec::new();
        }

        self.mutate(|inner, now| {
            descriptors
                .into_iter()
                .map(|descriptor| {
                    let id = TaskId::generate(&descriptor.profile);
                    inner.registry.put(id.clone(), NodeTask::new(descriptor, now));
                    inner.index.transition(&id, TaskState::Pending);
                    info!(
                        task_id = %id,
                        pending = inner.index.count(TaskState::Pending),
                        "marked task pending"
                    );
                    id
                })
                .collect()
        })
        .await
    }

    /// Records the latest status reported for a task.
    ///
    /// Statuses for unknown tasks are ignored. The state is persisted either
    /// way.
    pub async fn update_task(&self, status: TaskStatus) {
        self.mutate(|inner, now| {
            let id = status.task_id().clone();
            if !inner.registry.merge_status(&id, status, now) {
                debug!(task_id = %id, "ignoring status for unknown task");
            }
        })
        .await;
    }

    /// Moves `id` into `target`, leaving every other phase.
    ///
    /// Any transition is accepted, whatever phase the task was in, because
    /// cluster manager reports can arrive out of order. The identifier does
    /// not need a task record. Returns the previous phase.
    pub async fn transition(&self, id: &TaskId, target: TaskState) -> Option<TaskState> {
        self.mutate(|inner, _| {
            let previous = inner.index.transition(id, target);
            debug!(
                task_id = %id,
                from = previous.map_or("none", TaskState::as_str),
                to = target.as_str(),
                "task state changed"
            );
            previous
        })
        .await
    }

    /// Moves `id` into [`TaskState::Pending`].
    pub async fn make_pending(&self, id: &TaskId) {
        self.transition(id, TaskState::Pending).await;
    }

    /// Moves `id` into [`TaskState::Staging`].
    pub async fn make_staging(&self, id: &TaskId) {
        self.transition(id, TaskState::Staging).await;
    }

    /// Moves `id` into [`TaskState::Active`].
    pub async fn make_active(&self, id: &TaskId) {
        self.transition(id, TaskState::Active).await;
    }

    /// Moves `id` into [`TaskState::Lost`].
    pub async fn make_lost(&self, id: &TaskId) {
        self.transition(id, TaskState::Lost).await;
    }

    /// Moves `id` into [`TaskState::Killable`].
    pub async fn make_killable(&self, id: &TaskId) {
        self.transition(id, TaskState::Killable).await;
    }

    /// Forgets `id` entirely, returning its record if one existed.
    ///
    /// Unknown identifiers are a no-op. The state is persisted either way.
    pub async fn remove_task(&self, id: &TaskId) -> Option<NodeTask> {
        self.mutate(|inner, _| {
            inner.index.remove(id);
            let removed = inner.registry.remove(id);
            if removed.is_some() {
                info!(task_id = %id, "removed task");
            }
            removed
        })
        .await
    }

    /// Records the registration handle assigned by the cluster manager.
    pub async fn set_framework_id(&self, framework_id: FrameworkId) {
        self.mutate(|inner, _| {
            info!(framework_id = %framework_id, "framework registered");
            inner.framework_id = Some(framework_id);
        })
        .await;
    }

    /// Returns the current framework registration.
    #[must_use]
    pub fn framework_id(&self) -> Option<FrameworkId> {
        self.lock().framework_id.clone()
    }

    /// Returns a copy of the record for `id`.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<NodeTask> {
        self.lock().registry.get(id).cloned()
    }

    /// Returns `true` if a record exists for `id`.
    #[must_use]
    pub fn has_task(&self, id: &TaskId) -> bool {
        self.lock().registry.contains(id)
    }

    /// Returns the lifecycle phase of `id`.
    #[must_use]
    pub fn task_state(&self, id: &TaskId) -> Option<TaskState> {
        self.lock().index.state_of(id)
    }

    /// Returns the identifiers currently in `state`.
    #[must_use]
    pub fn task_ids(&self, state: TaskState) -> HashSet<TaskId> {
        self.lock().index.members(state)
    }

    /// Returns the identifiers waiting for an offer.
    #[must_use]
    pub fn pending_task_ids(&self) -> HashSet<TaskId> {
        self.task_ids(TaskState::Pending)
    }

    /// Returns the identifiers launched but not yet running.
    #[must_use]
    pub fn staging_task_ids(&self) -> HashSet<TaskId> {
        self.task_ids(TaskState::Staging)
    }

    /// Returns the identifiers reported running.
    #[must_use]
    pub fn active_task_ids(&self) -> HashSet<TaskId> {
        self.task_ids(TaskState::Active)
    }

    /// Returns the identifiers reported lost.
    #[must_use]
    pub fn lost_task_ids(&self) -> HashSet<TaskId> {
        self.task_ids(TaskState::Lost)
    }

    /// Returns the identifiers marked for termination.
    #[must_use]
    pub fn killable_task_ids(&self) -> HashSet<TaskId> {
        self.task_ids(TaskState::Killable)
    }

    /// Returns the active tasks that also have a record.
    ///
    /// Identifiers marked active without a record are left out.
    #[must_use]
    pub fn active_tasks(&self) -> Vec<(TaskId, NodeTask)> {
        let inner = self.lock();
        inner
            .index
            .iter_members(TaskState::Active)
            .filter_map(|id| {
                inner
                    .registry
                    .get(id)
                    .map(|task| (id.clone(), task.clone()))
            })
            .collect()
    }

    /// Returns the latest status of every task that has one.
    #[must_use]
    pub fn task_statuses(&self) -> Vec<TaskStatus> {
        self.lock().registry.statuses()
    }

    /// Returns the number of task records.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.lock().registry.len()
    }

    /// Captures the current state as a [`Snapshot`].
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}

/// Builder for [`SchedulerState`].
pub struct SchedulerStateBuilder<C = DefaultClock> {
    gateway: Option<Arc<dyn PersistenceGateway>>,
    codec: Arc<dyn SnapshotCodec>,
    clock: C,
}

impl<C> SchedulerStateBuilder<C>
where
    C: Clock + Send + Sync,
{
    /// Persists snapshots through `gateway`.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn PersistenceGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Persists snapshots through `gateway` when one is supplied.
    #[must_use]
    pub fn with_optional_gateway(mut self, gateway: Option<Arc<dyn PersistenceGateway>>) -> Self {
        self.gateway = gateway;
        self
    }

    /// Encodes snapshots with `codec` instead of JSON.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn SnapshotCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Timestamps task records with `clock`.
    #[must_use]
    pub fn with_clock<D>(self, clock: D) -> SchedulerStateBuilder<D>
    where
        D: Clock + Send + Sync,
    {
        SchedulerStateBuilder {
            gateway: self.gateway,
            codec: self.codec,
            clock,
        }
    }

    /// Builds the state, restoring the persisted snapshot if there is one.
    ///
    /// The gateway is read exactly once. A missing gateway, an empty store,
    /// a failed read or an undecodable snapshot all start from an empty
    /// state; construction never fails.
    pub async fn load(self) -> SchedulerState<C> {
        let writer = self
            .gateway
            .map(|gateway| SnapshotWriter::new(gateway, self.codec));

        let inner = match &writer {
            Some(writer) => writer
                .read()
                .await
                .map_or_else(StateInner::default, StateInner::from_snapshot),
            None => {
                info!("no persistence gateway configured; scheduler state will not survive restarts");
                StateInner::default()
            }
        };

        SchedulerState {
            inner: Mutex::new(inner),
            writer,
            clock: self.clock,
        }
    }
}
