//! Durable byte-blob store for scheduler state snapshots.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Opaque durable store holding the latest encoded snapshot.
///
/// The scheduler never interprets what the store does with the bytes. A
/// store has no timeout contract; callers needing bounded latency wrap their
/// implementation with one.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Replaces the stored blob with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the blob could not be written.
    async fn store(&self, bytes: Vec<u8>) -> PersistenceResult<()>;

    /// Returns the stored blob, or `None` when nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the store cannot be read.
    async fn load(&self) -> PersistenceResult<Option<Vec<u8>>>;
}

/// Errors returned by persistence gateways and snapshot codecs.
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    /// The underlying storage failed.
    #[error("persistence I/O error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot codec error: {0}")]
    Codec(String),

    /// The stored snapshot carries a schema version this build cannot read.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u64),

    /// The store is temporarily unavailable.
    #[error("persistence unavailable: {0}")]
    Unavailable(String),
}

impl PersistenceError {
    /// Wraps a storage error.
    #[must_use]
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }

    /// Creates a codec error.
    #[must_use]
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec(message.into())
    }
}
