//! Task records keyed by identifier.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::node::domain::{NodeTask, TaskId, TaskStatus};

/// Owns every node task record known to the scheduler.
///
/// Entries are never evicted implicitly; a record lives until
/// [`TaskRegistry::remove`] is called for it.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: HashMap<TaskId, NodeTask>,
}

impl TaskRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `task` under `id`, returning the record it replaced.
    pub fn put(&mut self, id: TaskId, task: NodeTask) -> Option<NodeTask> {
        self.tasks.insert(id, task)
    }

    /// Returns the record for `id`.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&NodeTask> {
        self.tasks.get(id)
    }

    /// Removes the record for `id`. Unknown identifiers are ignored.
    pub fn remove(&mut self, id: &TaskId) -> Option<NodeTask> {
        self.tasks.remove(id)
    }

    /// Returns `true` if a record exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Stores `status` on the record for `id`.
    ///
    /// Returns `false` without changing anything when `id` is unknown.
    pub fn merge_status(&mut self, id: &TaskId, status: TaskStatus, at: DateTime<Utc>) -> bool {
        match self.tasks.get_mut(id) {
            Some(task) => {
                task.apply_status(status, at);
                true
            }
            None => false,
        }
    }

    /// Returns the latest status of every task that has one, in no
    /// particular order.
    #[must_use]
    pub fn statuses(&self) -> Vec<TaskStatus> {
        self.tasks
            .values()
            .filter_map(|task| task.status().cloned())
            .collect()
    }

    /// Iterates all records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &NodeTask)> {
        self.tasks.iter()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the registry holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
