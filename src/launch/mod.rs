//! Launch command generation for node manager tasks.
//!
//! The scheduler hands a launched task one shell line that unpacks the
//! downloaded node manager distribution, installs the configuration fetched
//! from the resource manager, exports the node manager environment and
//! starts the node manager as the framework user. This module only builds
//! that string; it never executes anything.

mod command;
mod config;
mod error;
mod shell;
mod uri;

pub use command::LaunchCommandBuilder;
pub use config::LaunchConfig;
pub use error::LaunchError;
pub use shell::shell_escape;
pub use uri::file_name_from_uri;
