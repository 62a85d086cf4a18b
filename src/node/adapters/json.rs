//! Versioned JSON snapshot codec.
//!
//! Snapshots are written as one JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "framework_id": "framework-0001",
//!   "tasks": [{ "id": "nm.medium.…", "profile": { … }, "ports": { … }, … }],
//!   "pending": [], "staging": [], "active": ["nm.medium.…"], "lost": [], "killable": []
//! }
//! ```
//!
//! Every collection defaults to empty when absent, so a later schema version
//! can add collections that older documents simply lack.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::{
    domain::{FrameworkId, NodeTask, Snapshot, TaskId, TaskState},
    ports::{PersistenceError, PersistenceResult, SnapshotCodec},
};

/// JSON implementation of [`SnapshotCodec`].
///
/// # Examples
///
/// ```
/// use corral::node::adapters::JsonSnapshotCodec;
/// use corral::node::domain::Snapshot;
/// use corral::node::ports::SnapshotCodec;
///
/// let codec = JsonSnapshotCodec::new();
/// let bytes = codec.encode(&Snapshot::default()).expect("encodes");
/// assert_eq!(codec.decode(&bytes).expect("decodes"), Snapshot::default());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotCodec;

impl JsonSnapshotCodec {
    /// The schema version written by this codec.
    pub const CURRENT_VERSION: u32 = 1;

    /// Schema versions this codec can read.
    const SUPPORTED_VERSIONS: &'static [u64] = &[1];

    /// Creates a codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    framework_id: Option<FrameworkId>,
    #[serde(default)]
    tasks: Vec<TaskEntry>,
    #[serde(default)]
    pending: Vec<TaskId>,
    #[serde(default)]
    staging: Vec<TaskId>,
    #[serde(default)]
    active: Vec<TaskId>,
    #[serde(default)]
    lost: Vec<TaskId>,
    #[serde(default)]
    killable: Vec<TaskId>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskEntry {
    id: TaskId,
    #[serde(flatten)]
    task: NodeTask,
}

impl From<&Snapshot> for SnapshotDocument {
    fn from(snapshot: &Snapshot) -> Self {
        let ids = |state: TaskState| -> Vec<TaskId> {
            snapshot.members(state).iter().cloned().collect()
        };
        Self {
            version: JsonSnapshotCodec::CURRENT_VERSION,
            framework_id: snapshot.framework_id.clone(),
            tasks: snapshot
                .tasks
                .iter()
                .map(|(id, task)| TaskEntry {
                    id: id.clone(),
                    task: task.clone(),
                })
                .collect(),
            pending: ids(TaskState::Pending),
            staging: ids(TaskState::Staging),
            active: ids(TaskState::Active),
            lost: ids(TaskState::Lost),
            killable: ids(TaskState::Killable),
        }
    }
}

impl From<SnapshotDocument> for Snapshot {
    fn from(document: SnapshotDocument) -> Self {
        Self {
            framework_id: document.framework_id,
            tasks: document
                .tasks
                .into_iter()
                .map(|entry| (entry.id, entry.task))
                .collect(),
            pending: document.pending.into_iter().collect(),
            staging: document.staging.into_iter().collect(),
            active: document.active.into_iter().collect(),
            lost: document.lost.into_iter().collect(),
            killable: document.killable.into_iter().collect(),
        }
    }
}

impl SnapshotCodec for JsonSnapshotCodec {
    fn encode(&self, snapshot: &Snapshot) -> PersistenceResult<Vec<u8>> {
        serde_json::to_vec(&SnapshotDocument::from(snapshot))
            .map_err(|err| PersistenceError::codec(err.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> PersistenceResult<Snapshot> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| PersistenceError::codec(err.to_string()))?;
        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| PersistenceError::codec("snapshot is missing its version tag"))?;
        if !Self::SUPPORTED_VERSIONS.contains(&version) {
            return Err(PersistenceError::UnsupportedVersion(version));
        }
        let document: SnapshotDocument =
            serde_json::from_value(value).map_err(|err| PersistenceError::codec(err.to_string()))?;
        Ok(document.into())
    }

    fn current_version(&self) -> u32 {
        Self::CURRENT_VERSION
    }
}
