//! Given steps for node lifecycle BDD scenarios.

use super::world::{NodeLifecycleWorld, descriptor, run_async};
use rstest_bdd_macros::given;

#[given("an empty scheduler state")]
fn empty_scheduler_state(world: &mut NodeLifecycleWorld) {
    world.load_state();
}

#[given(r#"a scheduler state with {count:usize} "{profile}" nodes"#)]
fn scheduler_state_with_nodes(
    world: &mut NodeLifecycleWorld,
    count: usize,
    profile: String,
) -> Result<(), eyre::Report> {
    world.load_state();
    let descriptors = (0..count)
        .map(|_| descriptor(&profile))
        .collect::<Result<Vec<_>, _>>()?;
    let ids = run_async(world.state()?.add_nodes(descriptors));
    world.task_ids = ids;
    Ok(())
}
