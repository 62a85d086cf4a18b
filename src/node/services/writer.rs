//! Best-effort snapshot persistence.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

use crate::node::{
    domain::Snapshot,
    ports::{PersistenceGateway, SnapshotCodec},
};

/// Snapshots waiting for the store, and whether a caller is draining them.
#[derive(Debug, Default)]
struct StoreQueue {
    pending: Option<(u64, Snapshot)>,
    taken: u64,
    writing: bool,
}

/// Writes snapshots through a gateway, never failing the caller.
///
/// At most one caller talks to the gateway at a time. A caller that finds a
/// store in flight leaves its snapshot in a single latest-wins slot and
/// returns at once; the caller doing the store picks the slot up when its
/// own store finishes. A slow or hung store therefore only holds up the
/// call that started it. Revisions only move forward, so the durable copy
/// never goes back in time.
pub(super) struct SnapshotWriter {
    gateway: Arc<dyn PersistenceGateway>,
    codec: Arc<dyn SnapshotCodec>,
    queue: Mutex<StoreQueue>,
}

/// The right to drain the queue, handed back if the draining call is
/// dropped mid-store.
struct WriterTurn<'a> {
    writer: &'a SnapshotWriter,
    finished: bool,
}

impl WriterTurn<'_> {
    fn next(&mut self) -> Option<(u64, Snapshot)> {
        let mut queue = self.writer.queue();
        let next = queue.pending.take();
        match &next {
            Some((revision, _)) => queue.taken = *revision,
            None => {
                queue.writing = false;
                self.finished = true;
            }
        }
        next
    }
}

impl Drop for WriterTurn<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.writer.queue().writing = false;
        }
    }
}

impl SnapshotWriter {
    pub(super) fn new(gateway: Arc<dyn PersistenceGateway>, codec: Arc<dyn SnapshotCodec>) -> Self {
        Self {
            gateway,
            codec,
            queue: Mutex::new(StoreQueue::default()),
        }
    }

    fn queue(&self) -> MutexGuard<'_, StoreQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues `snapshot` and, unless another call is already storing,
    /// stores it and anything queued behind it. Failures are logged.
    pub(super) async fn write(&self, revision: u64, snapshot: Snapshot) {
        {
            let mut queue = self.queue();
            let newest = queue
                .pending
                .as_ref()
                .map_or(queue.taken, |(pending, _)| (*pending).max(queue.taken));
            if revision <= newest {
                debug!(revision, newest, "skipping superseded scheduler state snapshot");
                return;
            }
            queue.pending = Some((revision, snapshot));
            if queue.writing {
                debug!(revision, "store in progress; snapshot queued");
                return;
            }
            queue.writing = true;
        }

        let mut turn = WriterTurn {
            writer: self,
            finished: false,
        };
        while let Some((queued, queued_snapshot)) = turn.next() {
            self.store(queued, &queued_snapshot).await;
        }
    }

    async fn store(&self, revision: u64, snapshot: &Snapshot) {
        let bytes = match self.codec.encode(snapshot) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(revision, error = %err, "failed to encode scheduler state");
                return;
            }
        };

        match self.gateway.store(bytes).await {
            Ok(()) => info!(revision, "scheduler state stored to state store"),
            Err(err) => {
                error!(revision, error = %err, "failed to write scheduler state to state store");
            }
        }
    }

    /// Loads and decodes the stored snapshot.
    ///
    /// Returns `None`, after logging, when nothing is stored or the stored
    /// bytes cannot be read or decoded.
    pub(super) async fn read(&self) -> Option<Snapshot> {
        let bytes = match self.gateway.load().await {
            Ok(Some(bytes)) if !bytes.is_empty() => bytes,
            Ok(_) => {
                info!("no persisted scheduler state found");
                return None;
            }
            Err(err) => {
                error!(error = %err, "failed to read scheduler state from state store");
                return None;
            }
        };

        match self.codec.decode(&bytes) {
            Ok(snapshot) => {
                info!(
                    tasks = snapshot.tasks.len(),
                    version = self.codec.current_version(),
                    "scheduler state loaded from state store"
                );
                Some(snapshot)
            }
            Err(err) => {
                error!(error = %err, "failed to decode scheduler state; starting empty");
                None
            }
        }
    }
}
