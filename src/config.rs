//! Scheduler configuration.
//!
//! Configuration is a JSON document:
//!
//! ```json
//! {
//!   "state_dir": "/var/lib/corral",
//!   "state_file": "scheduler-state.json",
//!   "launch": {
//!     "node_manager_uri": "http://repo/hadoop-2.7.0.tgz",
//!     "framework_user": "yarn",
//!     "environment": { "YARN_HOME": "hadoop-2.7.0" }
//!   }
//! }
//! ```
//!
//! Omitting `state_dir` disables persistence; omitting `launch` disables
//! launch command generation.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::launch::{LaunchCommandBuilder, LaunchConfig, LaunchError};
use crate::node::adapters::FileGateway;
use crate::node::ports::{PersistenceError, PersistenceGateway};

/// Errors raised while loading or applying configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },

    /// The configuration path names no file.
    #[error("configuration path {0} does not name a file")]
    NotAFile(Utf8PathBuf),

    /// The configuration document is not valid.
    #[error("invalid configuration: {0}")]
    Parse(String),

    /// The snapshot file name is empty or contains a path separator.
    #[error("state_file must be a plain file name: {0:?}")]
    InvalidStateFile(String),

    /// The state directory could not be opened.
    #[error("failed to open state directory: {0}")]
    Persistence(#[from] PersistenceError),

    /// The launch settings are not usable.
    #[error("invalid launch settings: {0}")]
    Launch(#[from] LaunchError),
}

/// Top-level scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Directory holding the persisted snapshot; `None` disables persistence.
    #[serde(default)]
    pub state_dir: Option<Utf8PathBuf>,
    /// Snapshot file name inside `state_dir`.
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Node manager launch settings.
    #[serde(default)]
    pub launch: Option<LaunchConfig>,
}

fn default_state_file() -> String {
    FileGateway::DEFAULT_FILE_NAME.to_owned()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            state_file: default_state_file(),
            launch: None,
        }
    }
}

impl SchedulerConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields,
    /// and [`ConfigError::InvalidStateFile`] for an unusable file name.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the JSON configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, plus any
    /// error [`Self::from_json_str`] returns.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| ConfigError::NotAFile(path.to_owned()))?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let read_error = |source| ConfigError::Read {
            path: path.to_owned(),
            source: Arc::new(source),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let contents = dir.read_to_string(file_name).map_err(read_error)?;
        debug!(path = %path, "read scheduler configuration");
        Self::from_json_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let name = self.state_file.trim();
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(ConfigError::InvalidStateFile(self.state_file.clone()));
        }
        Ok(())
    }

    /// Opens the configured snapshot store.
    ///
    /// Returns `Ok(None)` when no state directory is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Persistence`] when the state directory cannot
    /// be created or opened.
    pub fn persistence_gateway(&self) -> Result<Option<Arc<dyn PersistenceGateway>>, ConfigError> {
        let Some(state_dir) = &self.state_dir else {
            info!("no state directory configured; persistence disabled");
            return Ok(None);
        };
        let gateway = FileGateway::open(state_dir)?.with_file_name(self.state_file.clone());
        info!(state_dir = %state_dir, file = gateway.file_name(), "persisting scheduler state");
        Ok(Some(Arc::new(gateway)))
    }

    /// Builds the launch command generator from the launch settings.
    ///
    /// Returns `Ok(None)` when no launch settings are configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Launch`] when the launch settings are invalid.
    pub fn launch_command_builder(&self) -> Result<Option<LaunchCommandBuilder>, ConfigError> {
        self.launch
            .clone()
            .map(LaunchCommandBuilder::new)
            .transpose()
            .map_err(ConfigError::from)
    }
}
