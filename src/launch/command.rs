//! Node manager launch command rendering.

use minijinja::Environment;
use serde::Serialize;
use tracing::debug;

use super::{LaunchConfig, LaunchError, file_name_from_uri, shell::is_variable_name, shell_escape};
use crate::node::domain::{NodePorts, Profile};

/// Variable carrying the node manager JVM properties.
const NODE_MANAGER_OPTS: &str = "YARN_NODEMANAGER_OPTS";

const LAUNCH_TEMPLATE: &str = concat!(
    "sudo tar -zxpf {{ archive }}",
    " && sudo chown {{ user }} .",
    " && cp conf {{ yarn_home }}/etc/hadoop/yarn-site.xml;",
    " {% for var in exports %}export {{ var.name }}={{ var.value }}",
    "{% if not loop.last %} && {% endif %}{% endfor %};",
    " sudo -E -u {{ user }} -H {{ yarn_home }}/bin/yarn nodemanager",
);

#[derive(Debug, Serialize)]
struct LaunchContext {
    archive: String,
    user: String,
    yarn_home: String,
    exports: Vec<Export>,
}

#[derive(Debug, Serialize)]
struct Export {
    name: String,
    value: String,
}

/// Builds the shell line that installs and starts a node manager.
///
/// Settings are validated once at construction so that rendering for a
/// given profile only fails if the template itself does.
///
/// # Examples
///
/// ```
/// use corral::launch::{LaunchCommandBuilder, LaunchConfig};
/// use corral::node::domain::{NodePorts, Profile};
///
/// let config = LaunchConfig::new("http://repo/hadoop.tgz", "yarn")
///     .with_env("YARN_HOME", "hadoop");
/// let builder = LaunchCommandBuilder::new(config).expect("valid settings");
/// let profile = Profile::new("small", 1, 1024).expect("valid profile");
/// let command = builder.command(&profile, &NodePorts::new()).expect("renders");
/// assert!(command.starts_with("sudo tar -zxpf 'hadoop.tgz'"));
/// ```
#[derive(Debug, Clone)]
pub struct LaunchCommandBuilder {
    config: LaunchConfig,
}

impl LaunchCommandBuilder {
    /// Validates `config` and wraps it in a builder.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when the URI names no file, the framework
    /// user is empty, `YARN_HOME` is missing, or an environment entry is not
    /// a valid shell variable name.
    pub fn new(config: LaunchConfig) -> Result<Self, LaunchError> {
        file_name_from_uri(&config.node_manager_uri)?;
        if config.framework_user.trim().is_empty() {
            return Err(LaunchError::EmptyUser);
        }
        config.yarn_home()?;
        if let Some(name) = config.environment.keys().find(|name| !is_variable_name(name)) {
            return Err(LaunchError::InvalidVariableName(name.clone()));
        }
        Ok(Self { config })
    }

    /// Returns the settings this builder renders from.
    #[must_use]
    pub const fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Renders the launch command for a node manager sized by `profile` and
    /// listening on `ports`.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::TemplateRender`] when rendering fails.
    pub fn command(&self, profile: &Profile, ports: &NodePorts) -> Result<String, LaunchError> {
        debug!(profile = profile.name(), "rendering node manager launch command");
        let context = self.context(profile, ports)?;
        Environment::new()
            .render_str(LAUNCH_TEMPLATE, context)
            .map_err(|err| LaunchError::TemplateRender(err.to_string()))
    }

    fn context(&self, profile: &Profile, ports: &NodePorts) -> Result<LaunchContext, LaunchError> {
        let archive = file_name_from_uri(&self.config.node_manager_uri)?;
        let yarn_home = self.config.yarn_home()?;
        let mut exports: Vec<Export> = self
            .config
            .environment
            .iter()
            .filter(|(name, _)| name.as_str() != NODE_MANAGER_OPTS)
            .map(|(name, value)| Export {
                name: name.clone(),
                value: shell_escape(value),
            })
            .collect();
        exports.push(Export {
            name: NODE_MANAGER_OPTS.to_owned(),
            value: shell_escape(&node_manager_opts(
                self.config.environment.get(NODE_MANAGER_OPTS).map(String::as_str),
                profile,
                ports,
            )),
        });

        Ok(LaunchContext {
            archive: shell_escape(archive),
            user: shell_escape(&self.config.framework_user),
            yarn_home: shell_escape(yarn_home),
            exports,
        })
    }
}

/// Joins any configured node manager options with the per-task resource and
/// port properties.
fn node_manager_opts(configured: Option<&str>, profile: &Profile, ports: &NodePorts) -> String {
    let mut opts: Vec<String> = configured
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
        .into_iter()
        .collect();
    opts.push(format!("-Dnodemanager.resource.cpu-vcores={}", profile.cpus()));
    opts.push(format!(
        "-Dnodemanager.resource.memory-mb={}",
        profile.memory_mb()
    ));
    opts.extend(
        ports
            .iter()
            .map(|(name, port)| format!("-Dmyriad.yarn.nodemanager.{name}=0.0.0.0:{port}")),
    );
    opts.join(" ")
}
