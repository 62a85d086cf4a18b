//! Prints a summary of a persisted scheduler state snapshot.
//!
//! Usage:
//!
//! ```text
//! corral_snapshot <state-dir> [file-name]
//! ```
//!
//! `state-dir` is the directory the scheduler persists into and `file-name`
//! defaults to `scheduler-state.json`. The summary lists the framework
//! registration, the number of tasks in each lifecycle phase and one line
//! per task. Logging is controlled by `RUST_LOG`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use corral::node::adapters::{FileGateway, JsonSnapshotCodec};
use corral::node::domain::{FrameworkId, Snapshot, TaskState, TaskStatus};
use corral::node::ports::{PersistenceError, PersistenceGateway, SnapshotCodec};
use std::env;
use std::io::{self, Write};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while inspecting a snapshot.
#[derive(Debug, Error)]
enum InspectError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to open state directory {path}: {source}")]
    OpenDir {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no snapshot stored in {0}")]
    Missing(Utf8PathBuf),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("failed to initialise runtime: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to write summary: {0}")]
    Output(#[source] io::Error),
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let (state_dir, file_name) = parse_args(collect_args()?)?;
    let snapshot = load_snapshot(&state_dir, &file_name)?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(render_summary(&snapshot).as_bytes())
        .map_err(InspectError::Output)?;
    Ok(())
}

fn collect_args() -> Result<Vec<String>, InspectError> {
    env::args_os()
        .skip(1)
        .map(|arg_os| {
            arg_os
                .into_string()
                .map_err(|_| InspectError::InvalidArgs("argument is not valid UTF-8".into()))
        })
        .collect()
}

fn parse_args(args: Vec<String>) -> Result<(Utf8PathBuf, String), InspectError> {
    let mut remaining = args.into_iter();
    let state_dir = remaining
        .next()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| InspectError::InvalidArgs("missing state directory argument".into()))?;
    let file_name = remaining
        .next()
        .unwrap_or_else(|| FileGateway::DEFAULT_FILE_NAME.to_owned());
    if let Some(extra) = remaining.next() {
        return Err(InspectError::InvalidArgs(format!("unexpected argument '{extra}'")));
    }
    Ok((state_dir, file_name))
}

fn load_snapshot(state_dir: &Utf8Path, file_name: &str) -> Result<Snapshot, InspectError> {
    // Opened without creating it.
    let dir = Dir::open_ambient_dir(state_dir, ambient_authority()).map_err(|source| {
        InspectError::OpenDir {
            path: state_dir.to_owned(),
            source,
        }
    })?;
    let gateway = FileGateway::new(dir).with_file_name(file_name);
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(InspectError::RuntimeInit)?;
    let bytes = runtime
        .block_on(gateway.load())?
        .ok_or_else(|| InspectError::Missing(state_dir.join(file_name)))?;
    debug!(bytes = bytes.len(), "read snapshot");
    Ok(JsonSnapshotCodec::new().decode(&bytes)?)
}

fn render_summary(snapshot: &Snapshot) -> String {
    let framework = snapshot
        .framework_id
        .as_ref()
        .map_or("<unregistered>", FrameworkId::as_str);
    let mut lines = vec![
        format!("framework: {framework}"),
        format!("tasks: {}", snapshot.tasks.len()),
    ];
    lines.extend(
        TaskState::ALL
            .into_iter()
            .map(|state| format!("{state}: {}", snapshot.members(state).len())),
    );
    lines.extend(snapshot.tasks.iter().map(|(id, task)| {
        let phase = TaskState::ALL
            .into_iter()
            .find(|state| snapshot.members(*state).contains(id))
            .map_or("untracked", TaskState::as_str);
        let reported = task.status().map_or("-", TaskStatus::state);
        format!(
            "{id} {phase} profile={} cpus={} memory_mb={} status={reported}",
            task.profile().name(),
            task.profile().cpus(),
            task.profile().memory_mb(),
        )
    }));
    lines.push(String::new());
    lines.join("\n")
}
