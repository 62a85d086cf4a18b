//! Then steps for node lifecycle BDD scenarios.

use super::world::NodeLifecycleWorld;
use corral::node::domain::TaskState;
use rstest_bdd_macros::then;

#[then("{count:usize} tasks are pending")]
fn tasks_are_pending(world: &NodeLifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let pending = world.state()?.pending_task_ids().len();
    if pending != count {
        return Err(eyre::eyre!("expected {count} pending tasks, found {pending}"));
    }
    Ok(())
}

#[then(r#"the task is in phase "{phase}""#)]
fn task_is_in_phase(world: &NodeLifecycleWorld, phase: String) -> Result<(), eyre::Report> {
    let expected = TaskState::try_from(phase.as_str())
        .map_err(|err| eyre::eyre!("invalid phase in scenario: {err}"))?;
    let id = world.first_task()?;
    let actual = world.state()?.task_state(id);
    if actual != Some(expected) {
        return Err(eyre::eyre!("expected task {id} in {expected}, found {actual:?}"));
    }
    Ok(())
}

#[then("every task is in exactly one phase")]
fn every_task_in_one_phase(world: &NodeLifecycleWorld) -> Result<(), eyre::Report> {
    let state = world.state()?;
    for id in &world.task_ids {
        let phases = TaskState::ALL
            .into_iter()
            .filter(|phase| state.task_ids(*phase).contains(id))
            .count();
        if phases != 1 {
            return Err(eyre::eyre!("task {id} is in {phases} phases"));
        }
    }
    Ok(())
}
