//! In-memory persistence gateway for tests and local runs.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::node::ports::{PersistenceError, PersistenceGateway, PersistenceResult};

/// Thread-safe in-memory byte-blob store.
///
/// Clones share the same blob, so a test can keep one handle and give
/// another to the scheduler state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    blob: Option<Vec<u8>>,
    store_count: usize,
}

impl InMemoryGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway already holding `bytes`.
    #[must_use]
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        let gateway = Self::new();
        if let Ok(mut state) = gateway.state.write() {
            state.blob = Some(bytes);
        }
        gateway
    }

    /// Returns a copy of the stored blob.
    ///
    /// Returns `None` if nothing has been stored or the lock is poisoned.
    #[must_use]
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.blob.clone())
    }

    /// Returns how many successful stores the gateway has accepted.
    #[must_use]
    pub fn store_count(&self) -> usize {
        self.state.read().map(|state| state.store_count).unwrap_or(0)
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn store(&self, bytes: Vec<u8>) -> PersistenceResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| PersistenceError::io(std::io::Error::other(err.to_string())))?;
        state.blob = Some(bytes);
        state.store_count += 1;
        Ok(())
    }

    async fn load(&self) -> PersistenceResult<Option<Vec<u8>>> {
        let state = self
            .state
            .read()
            .map_err(|err| PersistenceError::io(std::io::Error::other(err.to_string())))?;
        Ok(state.blob.clone())
    }
}
