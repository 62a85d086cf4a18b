//! Versioned encoding of scheduler state snapshots.

use super::PersistenceResult;
use crate::node::domain::Snapshot;

/// Encodes snapshots to bytes and back.
///
/// Implementations embed a schema version in every encoded snapshot so
/// fields can be added later without breaking data already persisted.
pub trait SnapshotCodec: Send + Sync {
    /// Encodes `snapshot` as one self-contained byte sequence.
    ///
    /// # Errors
    ///
    /// Returns [`super::PersistenceError::Codec`] when serialisation fails.
    fn encode(&self, snapshot: &Snapshot) -> PersistenceResult<Vec<u8>>;

    /// Decodes bytes produced by [`SnapshotCodec::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`super::PersistenceError::UnsupportedVersion`] for unknown
    /// schema versions and [`super::PersistenceError::Codec`] for malformed
    /// input.
    fn decode(&self, bytes: &[u8]) -> PersistenceResult<Snapshot>;

    /// Returns the schema version written by [`SnapshotCodec::encode`].
    fn current_version(&self) -> u32;
}
