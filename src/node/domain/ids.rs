//! Identifier types for node tasks and the framework registration.

use super::{NodeDomainError, Profile};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node-agent task.
///
/// Identifiers minted by the scheduler take the form
/// `nm.<profile>.<uuid>`. Identifiers echoed back by the cluster manager
/// are accepted verbatim as long as they are non-empty, so an empty task
/// identifier cannot reach the lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task identifier from an existing value.
    ///
    /// # Errors
    ///
    /// Returns [`NodeDomainError::EmptyTaskId`] when the value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, NodeDomainError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(NodeDomainError::EmptyTaskId);
        }
        Ok(Self(raw))
    }

    /// Mints a fresh identifier for a node launched with `profile`.
    #[must_use]
    pub fn generate(profile: &Profile) -> Self {
        Self(format!("nm.{}.{}", profile.name(), Uuid::new_v4()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskId {
    type Error = NodeDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registration handle assigned to the scheduler by the cluster manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FrameworkId(String);

impl FrameworkId {
    /// Creates a framework identifier.
    ///
    /// # Errors
    ///
    /// Returns [`NodeDomainError::EmptyFrameworkId`] when the value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, NodeDomainError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(NodeDomainError::EmptyFrameworkId);
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FrameworkId {
    type Error = NodeDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FrameworkId> for String {
    fn from(value: FrameworkId) -> Self {
        value.0
    }
}

impl fmt::Display for FrameworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
