//! Given steps for documentation round BDD scenarios.

use eyre::WrapErr;
use rstest_bdd_macros::given;

use super::world::{RoundWorld, passing_draft, run_async};

#[given("a commissioned documentation task")]
fn commissioned_task(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    let request = world.create_request();
    let task = run_async(world.lifecycle.create_task(world.admin, request))
        .wrap_err("create task in scenario setup")?;
    world.task = Some(task);
    Ok(())
}

#[given("the first writer has accepted the task")]
fn first_writer_accepted(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let task = run_async(world.lifecycle.accept_task(task_id, world.writer1))
        .wrap_err("accept task in scenario setup")?;
    world.task = Some(task);
    Ok(())
}

#[given("the first writer has saved a passing draft")]
fn first_writer_saved(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let draft = run_async(
        world
            .submission
            .save_draft(world.writer1, passing_draft(task_id)),
    )
    .wrap_err("save first writer's draft in scenario setup")?;
    world.first_draft = Some(draft.id());
    Ok(())
}

#[given("both writers have submitted passing drafts")]
fn both_writers_submitted(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    submit_both(world)
}

#[given(r#"an open voting session named "{title}""#)]
fn open_session(world: &mut RoundWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let (session, candidates) = run_async(world.sessions.open_session(world.admin, task_id, title))
        .wrap_err("open voting session in scenario setup")?;
    world.session = Some(session);
    world.candidates = candidates;
    Ok(())
}

/// Saves and submits a gate-passing draft for each writer, refreshing the
/// world's task with the post-submission state.
pub fn submit_both(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    for (writer, slot) in [(world.writer1, 0_usize), (world.writer2, 1)] {
        let draft = run_async(world.submission.save_draft(writer, passing_draft(task_id)))
            .wrap_err("save draft in scenario setup")?;
        let outcome = run_async(world.submission.submit_draft(writer, draft.id()))
            .wrap_err("submit draft in scenario setup")?;
        if slot == 0 {
            world.first_draft = Some(draft.id());
        } else {
            world.second_draft = Some(draft.id());
        }
        world.task = Some(outcome.task);
    }
    Ok(())
}
