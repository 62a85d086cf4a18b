//! File-backed persistence gateway scoped to one directory.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;
use tracing::warn;

use crate::node::ports::{PersistenceError, PersistenceGateway, PersistenceResult};

/// Stores the snapshot blob as a single file inside a capability-scoped
/// directory.
///
/// Writes land in a sibling temporary file that is renamed over the target,
/// so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileGateway {
    dir: Arc<Dir>,
    file_name: String,
}

impl FileGateway {
    /// File name used when none is configured.
    pub const DEFAULT_FILE_NAME: &'static str = "scheduler-state.json";

    /// Wraps an already opened directory.
    #[must_use]
    pub fn new(dir: Dir) -> Self {
        Self {
            dir: Arc::new(dir),
            file_name: Self::DEFAULT_FILE_NAME.to_owned(),
        }
    }

    /// Opens `path`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: &Utf8Path) -> PersistenceResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(PersistenceError::io)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(PersistenceError::io)?;
        Ok(Self::new(dir))
    }

    /// Stores the snapshot under `file_name` instead of the default.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Returns the snapshot file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    fn temp_file_name(&self) -> String {
        format!(".{}.tmp", self.file_name)
    }
}

/// Removes a leftover temporary file after a failed store.
fn discard_temp_file(dir: &Dir, temp: &str) {
    match dir.remove_file(temp) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(file = temp, error = %err, "failed to remove temporary snapshot file"),
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn store(&self, bytes: Vec<u8>) -> PersistenceResult<()> {
        let dir = Arc::clone(&self.dir);
        let target = self.file_name.clone();
        let temp = self.temp_file_name();
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let written = dir
                .write(&temp, &bytes)
                .and_then(|()| dir.rename(&temp, &dir, &target));
            if written.is_err() {
                discard_temp_file(&dir, &temp);
            }
            written
        })
        .await
        .map_err(PersistenceError::io)?
        .map_err(PersistenceError::io)
    }

    async fn load(&self) -> PersistenceResult<Option<Vec<u8>>> {
        let dir = Arc::clone(&self.dir);
        let target = self.file_name.clone();
        let read = tokio::task::spawn_blocking(move || dir.read(&target))
            .await
            .map_err(PersistenceError::io)?;
        match read {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PersistenceError::io(err)),
        }
    }
}
