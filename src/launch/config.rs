//! Launch settings.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::LaunchError;

/// Environment entry naming the node manager installation directory.
const YARN_HOME: &str = "YARN_HOME";

/// Settings the launch command is generated from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LaunchConfig {
    /// Where executors download the node manager distribution from.
    pub node_manager_uri: String,
    /// The user the node manager runs as.
    pub framework_user: String,
    /// Variables exported before the node manager starts.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

impl LaunchConfig {
    /// Creates settings with an empty environment.
    #[must_use]
    pub fn new(node_manager_uri: impl Into<String>, framework_user: impl Into<String>) -> Self {
        Self {
            node_manager_uri: node_manager_uri.into(),
            framework_user: framework_user.into(),
            environment: BTreeMap::new(),
        }
    }

    /// Adds one exported variable.
    #[must_use]
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(name.into(), value.into());
        self
    }

    /// Returns the node manager installation directory.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::MissingEnvironment`] when `YARN_HOME` is not
    /// part of the environment.
    pub fn yarn_home(&self) -> Result<&str, LaunchError> {
        self.environment
            .get(YARN_HOME)
            .map(String::as_str)
            .ok_or_else(|| LaunchError::MissingEnvironment(YARN_HOME.to_owned()))
    }
}
