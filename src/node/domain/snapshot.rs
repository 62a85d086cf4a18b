//! The persisted scheduler state unit.

use super::{FrameworkId, NodeTask, TaskId, TaskState};
use std::collections::{BTreeMap, BTreeSet};

/// Full scheduler state captured as one atomic unit.
///
/// A snapshot holds the framework registration, every task record, and the
/// membership of each lifecycle phase. It is encoded and stored whole; a
/// partially written snapshot is never a valid state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Framework registration, absent until the first registration.
    pub framework_id: Option<FrameworkId>,
    /// Task records keyed by identifier.
    pub tasks: BTreeMap<TaskId, NodeTask>,
    /// Tasks waiting for an offer.
    pub pending: BTreeSet<TaskId>,
    /// Tasks launched but not yet running.
    pub staging: BTreeSet<TaskId>,
    /// Tasks reported running.
    pub active: BTreeSet<TaskId>,
    /// Tasks reported lost.
    pub lost: BTreeSet<TaskId>,
    /// Tasks marked for termination.
    pub killable: BTreeSet<TaskId>,
}

impl Snapshot {
    /// Returns the members of the set tracking `state`.
    #[must_use]
    pub const fn members(&self, state: TaskState) -> &BTreeSet<TaskId> {
        match state {
            TaskState::Pending => &self.pending,
            TaskState::Staging => &self.staging,
            TaskState::Active => &self.active,
            TaskState::Lost => &self.lost,
            TaskState::Killable => &self.killable,
        }
    }

    /// Returns a mutable reference to the set tracking `state`.
    pub const fn members_mut(&mut self, state: TaskState) -> &mut BTreeSet<TaskId> {
        match state {
            TaskState::Pending => &mut self.pending,
            TaskState::Staging => &mut self.staging,
            TaskState::Active => &mut self.active,
            TaskState::Lost => &mut self.lost,
            TaskState::Killable => &mut self.killable,
        }
    }

    /// Returns `true` when the snapshot carries no identity, tasks or
    /// memberships.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.framework_id.is_none()
            && self.tasks.is_empty()
            && TaskState::ALL
                .iter()
                .all(|state| self.members(*state).is_empty())
    }
}
