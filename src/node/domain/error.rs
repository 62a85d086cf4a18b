//! Error types for node domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing node domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NodeDomainError {
    /// The task identifier is empty.
    #[error("task identifier must not be empty")]
    EmptyTaskId,

    /// The framework identifier is empty.
    #[error("framework identifier must not be empty")]
    EmptyFrameworkId,

    /// The profile name is empty after trimming.
    #[error("profile name must not be empty")]
    EmptyProfileName,
}

/// Error returned while parsing task lifecycle states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);
