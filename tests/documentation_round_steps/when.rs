//! When steps for documentation round BDD scenarios.

use eyre::WrapErr;
use rstest_bdd_macros::when;
use scriptorium::voting::domain::{BinaryChoice, SessionChoice};

use super::given::submit_both;
use super::world::{RoundWorld, run_async, thin_draft};

#[when("both writers submit passing drafts")]
fn both_writers_submit(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    submit_both(world)
}

#[when("the second writer submits a two-line draft")]
fn second_writer_submits_thin_draft(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let draft = run_async(world.submission.save_draft(world.writer2, thin_draft(task_id)))
        .wrap_err("save thin draft")?;
    let result = run_async(world.submission.submit_draft(world.writer2, draft.id()));
    world.last_submission = Some(result);
    Ok(())
}

#[when("the second writer views the first writer's draft")]
fn second_writer_views_rival_draft(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    let document_id = world
        .first_draft
        .ok_or_else(|| eyre::eyre!("missing first writer's draft in scenario world"))?;
    let view = run_async(world.submission.view_draft(world.writer2, document_id))
        .wrap_err("view rival draft")?;
    world.last_view = Some(view);
    Ok(())
}

#[when("two reviewers prefer version A and one prefers version B")]
fn two_a_one_b(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    cast_binary(
        world,
        &[
            BinaryChoice::VersionA,
            BinaryChoice::VersionA,
            BinaryChoice::VersionB,
        ],
    )
}

#[when("every reviewer finds neither version satisfactory")]
fn all_neither(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    cast_binary(
        world,
        &[
            BinaryChoice::NeitherSatisfactory,
            BinaryChoice::NeitherSatisfactory,
            BinaryChoice::NeitherSatisfactory,
        ],
    )
}

#[when("one reviewer prefers version A and one prefers version B")]
fn one_a_one_b(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    cast_binary(world, &[BinaryChoice::VersionA, BinaryChoice::VersionB])
}

#[when("the administrator resolves the vote")]
fn administrator_resolves(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let result = run_async(world.binary.resolve(world.admin, task_id));
    if let Ok(ref resolution) = result {
        world.task = Some(resolution.task.clone());
    }
    world.last_resolution = Some(result);
    Ok(())
}

#[when("every reviewer backs the first writer's candidate")]
fn reviewers_back_first_candidate(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    let session_id = world
        .session
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing session in scenario world"))?
        .id();
    let candidate_id = world
        .candidates
        .iter()
        .find(|candidate| candidate.author() == world.writer1)
        .map(scriptorium::voting::domain::Candidate::id)
        .ok_or_else(|| eyre::eyre!("first writer has no candidate in the session"))?;
    for reviewer in world.reviewers {
        run_async(world.sessions.cast_vote(
            reviewer,
            session_id,
            SessionChoice::Candidate(candidate_id),
        ))
        .wrap_err("cast session ballot")?;
    }
    Ok(())
}

#[when("the administrator ends the session")]
fn administrator_ends_session(world: &mut RoundWorld) -> Result<(), eyre::Report> {
    let session_id = world
        .session
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing session in scenario world"))?
        .id();
    let result = run_async(world.sessions.end_session(world.admin, session_id));
    if let Ok(ref outcome) = result {
        world.task = Some(outcome.task.clone());
    }
    world.last_session_end = Some(result);
    Ok(())
}

fn cast_binary(world: &mut RoundWorld, choices: &[BinaryChoice]) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    for (reviewer, choice) in world.reviewers.iter().zip(choices) {
        run_async(world.binary.cast_vote(*reviewer, task_id, *choice, None))
            .wrap_err("cast binary ballot")?;
    }
    Ok(())
}
