//! When steps for node lifecycle BDD scenarios.

use super::world::{NodeLifecycleWorld, descriptor, run_async};
use corral::node::domain::{TaskId, TaskState};
use rstest_bdd_macros::when;

#[when(r#"{count:usize} nodes with profile "{profile}" are added"#)]
fn nodes_are_added(
    world: &mut NodeLifecycleWorld,
    count: usize,
    profile: String,
) -> Result<(), eyre::Report> {
    let descriptors = (0..count)
        .map(|_| descriptor(&profile))
        .collect::<Result<Vec<_>, _>>()?;
    let ids = run_async(world.state()?.add_nodes(descriptors));
    world.task_ids.extend(ids);
    Ok(())
}

#[when(r#"the task is moved to "{phase}""#)]
fn task_is_moved(world: &mut NodeLifecycleWorld, phase: String) -> Result<(), eyre::Report> {
    let target = TaskState::try_from(phase.as_str())
        .map_err(|err| eyre::eyre!("invalid phase in scenario: {err}"))?;
    let id = world.first_task()?;
    run_async(world.state()?.transition(id, target));
    Ok(())
}

#[when("an unknown task is removed")]
fn unknown_task_is_removed(world: &mut NodeLifecycleWorld) -> Result<(), eyre::Report> {
    let unknown = TaskId::new("nm.small.never-registered")?;
    let removed = run_async(world.state()?.remove_task(&unknown));
    eyre::ensure!(removed.is_none(), "unknown task unexpectedly removed");
    Ok(())
}

#[when("the scheduler restarts")]
fn scheduler_restarts(world: &mut NodeLifecycleWorld) {
    world.state = None;
    world.load_state();
}
