//! Concurrent access to one shared scheduler state.

use std::sync::Arc;

use corral::node::{
    adapters::{InMemoryGateway, JsonSnapshotCodec},
    domain::{TaskId, TaskState, TaskStatus},
    ports::SnapshotCodec,
};
use eyre::{Result, ensure, eyre};
use rstest::rstest;
use tokio::task::JoinSet;

use super::helpers::{descriptor, gateway, phases_containing, scheduler};

const TASKS: usize = 64;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transitions_on_distinct_tasks_all_land(
    gateway: InMemoryGateway,
) -> Result<()> {
    let state = Arc::new(scheduler(&gateway).await);
    let ids = state
        .add_nodes((0..TASKS).map(|_| descriptor("medium")))
        .await;
    let targets: Vec<(TaskId, TaskState)> = ids
        .iter()
        .cloned()
        .zip(TaskState::ALL.into_iter().cycle())
        .collect();

    let mut workers = JoinSet::new();
    for (id, target) in targets.clone() {
        let shared = Arc::clone(&state);
        workers.spawn(async move {
            shared.make_staging(&id).await;
            shared
                .update_task(TaskStatus::new(id.clone(), "TASK_STAGING"))
                .await;
            shared.transition(&id, target).await;
        });
    }
    while let Some(joined) = workers.join_next().await {
        joined?;
    }

    for (id, target) in &targets {
        let phases = phases_containing(&state, id);
        ensure!(
            phases == vec![*target],
            "task {id} should be only in {target}, found {phases:?}"
        );
    }
    ensure!(state.task_statuses().len() == TASKS, "every status should be merged");

    let bytes = gateway
        .contents()
        .ok_or_else(|| eyre!("a snapshot should be stored"))?;
    let stored = JsonSnapshotCodec::new().decode(&bytes)?;
    ensure!(
        stored == state.snapshot(),
        "the last stored snapshot should match the final state"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registration_and_removal_stay_consistent(
    gateway: InMemoryGateway,
) -> Result<()> {
    let state = Arc::new(scheduler(&gateway).await);
    let doomed = state
        .add_nodes((0..TASKS).map(|_| descriptor("small")))
        .await;

    let mut workers = JoinSet::new();
    for id in doomed.clone() {
        let shared = Arc::clone(&state);
        workers.spawn(async move {
            shared.make_killable(&id).await;
            shared.remove_task(&id).await;
            Vec::new()
        });
    }
    for _ in 0..8 {
        let shared = Arc::clone(&state);
        workers.spawn(async move { shared.add_nodes(vec![descriptor("large")]).await });
    }
    let mut added = Vec::new();
    while let Some(joined) = workers.join_next().await {
        added.extend(joined?);
    }

    ensure!(state.task_count() == added.len(), "only new tasks should remain");
    ensure!(state.killable_task_ids().is_empty(), "removed tasks left killable ids");
    for id in &added {
        ensure!(
            phases_containing(&state, id) == vec![TaskState::Pending],
            "new task {id} should be pending"
        );
    }
    for id in &doomed {
        ensure!(!state.has_task(id), "task {id} should be removed");
    }
    Ok(())
}
