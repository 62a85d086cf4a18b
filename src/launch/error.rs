//! Errors raised while building launch commands.

use thiserror::Error;

/// Errors raised while building a node manager launch command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LaunchError {
    /// The distribution URI is empty.
    #[error("node manager URI must not be empty")]
    EmptyUri,

    /// The distribution URI ends in `/`, so it names no file.
    #[error("node manager URI should not have a slash at the end: {0}")]
    TrailingSlash(String),

    /// No framework user is configured.
    #[error("framework user must not be empty")]
    EmptyUser,

    /// A required environment entry is missing.
    #[error("launch environment is missing {0}")]
    MissingEnvironment(String),

    /// An environment entry name is not a valid shell variable name.
    #[error("invalid environment variable name: {0:?}")]
    InvalidVariableName(String),

    /// The command template failed to render.
    #[error("failed to render launch command: {0}")]
    TemplateRender(String),
}
