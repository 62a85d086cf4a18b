//! Lifecycle membership index.
//!
//! Each tracked identifier maps to exactly one [`TaskState`], which makes
//! the five lifecycle sets mutually exclusive by construction. A reverse
//! index from state to identifiers is kept in step so set queries do not
//! scan every task.

use std::collections::{HashMap, HashSet};

use crate::node::domain::{TaskId, TaskState};

/// Tracks which lifecycle phase each task identifier is in.
///
/// The index does not require identifiers to have a task record. The
/// scheduler state joins the two where a query needs both.
#[derive(Debug, Clone, Default)]
pub struct StatusIndex {
    states: HashMap<TaskId, TaskState>,
    members: HashMap<TaskState, HashSet<TaskId>>,
}

impl StatusIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `id` into `target`, leaving every other phase.
    ///
    /// Any transition is accepted, including from an untracked identifier.
    /// Returns the phase the identifier was in before the call.
    pub fn transition(&mut self, id: &TaskId, target: TaskState) -> Option<TaskState> {
        let previous = self.states.insert(id.clone(), target);
        if previous == Some(target) {
            return previous;
        }
        if let Some(old_state) = previous {
            self.remove_member(old_state, id);
        }
        self.members.entry(target).or_default().insert(id.clone());
        previous
    }

    /// Stops tracking `id`. Unknown identifiers are ignored.
    pub fn remove(&mut self, id: &TaskId) -> Option<TaskState> {
        let previous = self.states.remove(id);
        if let Some(old_state) = previous {
            self.remove_member(old_state, id);
        }
        previous
    }

    /// Returns the phase `id` is in.
    #[must_use]
    pub fn state_of(&self, id: &TaskId) -> Option<TaskState> {
        self.states.get(id).copied()
    }

    /// Returns `true` if `id` is in `state`.
    #[must_use]
    pub fn contains(&self, state: TaskState, id: &TaskId) -> bool {
        self.state_of(id) == Some(state)
    }

    /// Returns a copy of the identifiers in `state`.
    #[must_use]
    pub fn members(&self, state: TaskState) -> HashSet<TaskId> {
        self.members.get(&state).cloned().unwrap_or_default()
    }

    /// Iterates the identifiers in `state`.
    pub fn iter_members(&self, state: TaskState) -> impl Iterator<Item = &TaskId> {
        self.members.get(&state).into_iter().flatten()
    }

    /// Returns the number of identifiers in `state`.
    #[must_use]
    pub fn count(&self, state: TaskState) -> usize {
        self.members.get(&state).map_or(0, HashSet::len)
    }

    /// Returns the number of tracked identifiers across all phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` when no identifier is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn remove_member(&mut self, state: TaskState, id: &TaskId) {
        if let Some(ids) = self.members.get_mut(&state) {
            ids.remove(id);
            if ids.is_empty() {
                self.members.remove(&state);
            }
        }
    }
}
