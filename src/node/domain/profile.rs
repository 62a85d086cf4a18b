//! Resource profiles and port assignments for node-agent launches.

use super::NodeDomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named resource template describing a requested node flavour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    name: String,
    cpus: u32,
    memory_mb: u64,
}

impl Profile {
    /// Creates a validated profile.
    ///
    /// # Errors
    ///
    /// Returns [`NodeDomainError::EmptyProfileName`] if the name is empty
    /// after trimming.
    pub fn new(name: impl Into<String>, cpus: u32, memory_mb: u64) -> Result<Self, NodeDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NodeDomainError::EmptyProfileName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            cpus,
            memory_mb,
        })
    }

    /// Returns the profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of virtual cores offered to the node.
    #[must_use]
    pub const fn cpus(&self) -> u32 {
        self.cpus
    }

    /// Returns the memory offered to the node, in megabytes.
    #[must_use]
    pub const fn memory_mb(&self) -> u64 {
        self.memory_mb
    }
}

/// Port numbers assigned to a node, keyed by port name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePorts(BTreeMap<String, u16>);

impl NodePorts {
    /// Creates an empty port assignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `port` to `name`, replacing any earlier assignment.
    #[must_use]
    pub fn with_port(mut self, name: impl Into<String>, port: u16) -> Self {
        self.0.insert(name.into(), port);
        self
    }

    /// Returns the port assigned to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u16> {
        self.0.get(name).copied()
    }

    /// Iterates assignments in port-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.0.iter().map(|(name, port)| (name.as_str(), *port))
    }

    /// Returns the number of assigned ports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no port is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u16)> for NodePorts {
    fn from_iter<I: IntoIterator<Item = (String, u16)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
