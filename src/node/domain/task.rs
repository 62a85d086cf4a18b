//! Node task records, lifecycle phases and status payloads.

use super::{NodePorts, ParseTaskStateError, Profile, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lifecycle phase of a node task as tracked by the scheduler.
///
/// Phases are not a strict pipeline. Reports from the cluster manager can
/// arrive out of order, so any phase may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Registered and waiting for a matching resource offer.
    Pending,
    /// Launched on an offer, not yet reported running.
    Staging,
    /// Reported running by the cluster manager.
    Active,
    /// Reported lost by the cluster manager.
    Lost,
    /// Marked for termination.
    Killable,
}

impl TaskState {
    /// Every phase, in snapshot order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Staging,
        Self::Active,
        Self::Lost,
        Self::Killable,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Staging => "staging",
            Self::Active => "active",
            Self::Lost => "lost",
            Self::Killable => "killable",
        }
    }

    /// Returns `true` for phases the task does not leave on its own.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost | Self::Killable)
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "staging" => Ok(Self::Staging),
            "active" => Ok(Self::Active),
            "lost" => Ok(Self::Lost),
            "killable" => Ok(Self::Killable),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest status reported by the cluster manager for one task.
///
/// The cluster manager's own state vocabulary is carried verbatim in
/// `state`; the scheduler never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    task_id: TaskId,
    state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

impl TaskStatus {
    /// Creates a status payload for `task_id`.
    #[must_use]
    pub fn new(task_id: TaskId, state: impl Into<String>) -> Self {
        Self {
            task_id,
            state: state.into(),
            message: None,
            data: Value::Null,
        }
    }

    /// Sets the human-readable status message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the opaque status metadata.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Returns the task the status refers to.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the state label as reported by the cluster manager.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the status message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the opaque status metadata.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }
}

/// Registration input for one node: what to launch and on which ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// Resource profile to launch.
    pub profile: Profile,
    /// Ports assigned to the node.
    pub ports: NodePorts,
}

impl NodeDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(profile: Profile, ports: NodePorts) -> Self {
        Self { profile, ports }
    }
}

/// One node-agent instance managed by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTask {
    profile: Profile,
    ports: NodePorts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NodeTask {
    /// Creates a task record from a registration descriptor.
    #[must_use]
    pub fn new(descriptor: NodeDescriptor, registered_at: DateTime<Utc>) -> Self {
        Self {
            profile: descriptor.profile,
            ports: descriptor.ports,
            status: None,
            registered_at,
            updated_at: registered_at,
        }
    }

    /// Returns the resource profile.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Returns the port assignment.
    #[must_use]
    pub const fn ports(&self) -> &NodePorts {
        &self.ports
    }

    /// Returns the latest reported status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<&TaskStatus> {
        self.status.as_ref()
    }

    /// Returns when the task was registered.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns when the task record last changed.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the latest status with `status`.
    pub fn apply_status(&mut self, status: TaskStatus, at: DateTime<Utc>) {
        self.status = Some(status);
        self.updated_at = at;
    }
}
