//! In-memory integration tests for scheduler state operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};
use corral::node::{
    adapters::{InMemoryGateway, JsonSnapshotCodec},
    domain::{FrameworkId, Snapshot, TaskState, TaskStatus},
    ports::{PersistenceResult, SnapshotCodec},
    services::SchedulerState,
};
use eyre::{Result, ensure, eyre};
use mockable::Clock;
use rstest::rstest;
use serde_json::json;

use super::helpers::{descriptor, gateway, phases_containing, scheduler};

/// Clock pinned to one instant.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// JSON codec that counts how many snapshots it encodes.
#[derive(Default)]
struct CountingCodec {
    encoded: AtomicUsize,
}

impl SnapshotCodec for CountingCodec {
    fn encode(&self, snapshot: &Snapshot) -> PersistenceResult<Vec<u8>> {
        self.encoded.fetch_add(1, Ordering::SeqCst);
        JsonSnapshotCodec::new().encode(snapshot)
    }

    fn decode(&self, bytes: &[u8]) -> PersistenceResult<Snapshot> {
        JsonSnapshotCodec::new().decode(bytes)
    }

    fn current_version(&self) -> u32 {
        JsonSnapshotCodec::CURRENT_VERSION
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_survives_restart(gateway: InMemoryGateway) -> Result<()> {
    let first = scheduler(&gateway).await;
    let ids = first
        .add_nodes(vec![descriptor("small"), descriptor("large"), descriptor("large")])
        .await;
    let [staged, running, lost] = ids.as_slice() else {
        return Err(eyre!("expected three task ids, got {}", ids.len()));
    };
    first.make_staging(staged).await;
    first.make_active(running).await;
    first
        .update_task(
            TaskStatus::new(running.clone(), "TASK_RUNNING")
                .with_message("node manager registered")
                .with_data(json!({ "host": "worker-7", "pid": 4242 })),
        )
        .await;
    first.make_lost(lost).await;
    first
        .set_framework_id(FrameworkId::new("20261016-0001")?)
        .await;

    let second = scheduler(&gateway).await;

    ensure!(second.snapshot() == first.snapshot(), "restored state differs");
    ensure!(
        second.task_state(running) == Some(TaskState::Active),
        "running task should be active"
    );
    let statuses = second.task_statuses();
    ensure!(statuses.len() == 1, "expected one status, got {}", statuses.len());
    let status = statuses.first().ok_or_else(|| eyre!("missing status"))?;
    ensure!(
        status.data().get("host") == Some(&json!("worker-7")),
        "status payload should survive restart"
    );
    let active = second.active_tasks();
    ensure!(
        active.iter().map(|(id, _)| id).eq([running]),
        "only the running task should be active"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removal_is_persisted(gateway: InMemoryGateway) -> Result<()> {
    let first = scheduler(&gateway).await;
    let ids = first
        .add_nodes(vec![descriptor("small"), descriptor("small")])
        .await;
    let [kept, removed] = ids.as_slice() else {
        return Err(eyre!("expected two task ids"));
    };
    first.make_killable(removed).await;
    first.remove_task(removed).await;

    let second = scheduler(&gateway).await;

    ensure!(second.has_task(kept), "kept task should survive");
    ensure!(!second.has_task(removed), "removed task should stay removed");
    ensure!(
        phases_containing(&second, removed).is_empty(),
        "removed task should not be in any phase"
    );
    ensure!(second.killable_task_ids().is_empty(), "no task should be killable");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_mutator_stores_a_snapshot(gateway: InMemoryGateway) -> Result<()> {
    let codec = Arc::new(CountingCodec::default());
    let state = SchedulerState::builder()
        .with_gateway(Arc::new(gateway.clone()))
        .with_codec(Arc::clone(&codec) as Arc<dyn SnapshotCodec>)
        .load()
        .await;

    let ids = state.add_nodes(vec![descriptor("medium")]).await;
    let id = ids.first().ok_or_else(|| eyre!("expected a task id"))?;
    state.make_staging(id).await;
    state.make_staging(id).await;
    state
        .update_task(TaskStatus::new(id.clone(), "TASK_STAGING"))
        .await;
    state.remove_task(id).await;
    state.remove_task(id).await;
    state.set_framework_id(FrameworkId::new("fw")?).await;

    ensure!(
        codec.encoded.load(Ordering::SeqCst) == 7,
        "expected seven encodes, got {}",
        codec.encoded.load(Ordering::SeqCst)
    );
    ensure!(gateway.store_count() == 7, "expected seven stores");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn injected_clock_stamps_records(gateway: InMemoryGateway) -> Result<()> {
    let instant = Utc
        .with_ymd_and_hms(2026, 10, 16, 9, 30, 0)
        .single()
        .ok_or_else(|| eyre!("invalid instant"))?;
    let state = SchedulerState::builder()
        .with_gateway(Arc::new(gateway))
        .with_clock(FixedClock(instant))
        .load()
        .await;

    let ids = state.add_nodes(vec![descriptor("small")]).await;
    let id = ids.first().ok_or_else(|| eyre!("expected a task id"))?;
    state
        .update_task(TaskStatus::new(id.clone(), "TASK_RUNNING"))
        .await;

    let task = state.task(id).ok_or_else(|| eyre!("task should exist"))?;
    ensure!(task.registered_at() == instant, "registration time mismatch");
    ensure!(task.updated_at() == instant, "update time mismatch");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn state_without_gateway_is_fully_functional() -> Result<()> {
    let state = SchedulerState::builder().load().await;

    let ids = state
        .add_nodes(vec![descriptor("small"), descriptor("small")])
        .await;
    for id in &ids {
        state.make_active(id).await;
    }

    ensure!(state.active_tasks().len() == 2, "both tasks should be active");
    ensure!(state.pending_task_ids().is_empty(), "no task should be pending");
    Ok(())
}
