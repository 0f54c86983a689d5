//! Then steps for documentation round BDD scenarios.

use rstest_bdd_macros::then;
use scriptorium::draft::domain::{DraftStatus, DraftView};
use scriptorium::errors::OperationError;
use scriptorium::workflow::domain::TaskStatus;

use super::world::{RoundWorld, run_async};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &RoundWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.task_id()?;
    let task = run_async(world.lifecycle.find_task(task_id))
        .map_err(|err| eyre::eyre!("refetch task: {err}"))?
        .ok_or_else(|| eyre::eyre!("task vanished from storage"))?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then("the submission is refused by the quality gate")]
fn submission_refused(world: &RoundWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_submission
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing submission result"))?;
    if !matches!(result, Err(OperationError::QualityGateFailed { .. })) {
        return Err(eyre::eyre!("expected QualityGateFailed, got {result:?}"));
    }
    Ok(())
}

#[then("the draft content is redacted")]
fn draft_content_redacted(world: &RoundWorld) -> Result<(), eyre::Report> {
    let view = world
        .last_view
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing draft view"))?;
    if view.title.is_some()
        || view.body.is_some()
        || view.api_configs.is_some()
        || view.use_case_scripts.is_some()
    {
        return Err(eyre::eyre!("expected a redacted view, got {view:?}"));
    }
    Ok(())
}

#[then("the first writer's draft is selected")]
fn first_draft_selected(world: &RoundWorld) -> Result<(), eyre::Report> {
    let view = draft_of(world, world.writer1)?;
    if view.status != DraftStatus::Selected {
        return Err(eyre::eyre!(
            "expected the first writer's draft to be selected, found {}",
            view.status
        ));
    }
    Ok(())
}

#[then("the second writer's draft is rejected")]
fn second_draft_rejected(world: &RoundWorld) -> Result<(), eyre::Report> {
    let view = draft_of(world, world.writer2)?;
    if view.status != DraftStatus::Rejected {
        return Err(eyre::eyre!(
            "expected the second writer's draft to be rejected, found {}",
            view.status
        ));
    }
    Ok(())
}

#[then("no winning draft is chosen")]
fn no_winning_draft(world: &RoundWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_resolution
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing resolution result"))?;
    match result {
        Ok(resolution) if resolution.winner.is_none() => Ok(()),
        Ok(resolution) => Err(eyre::eyre!(
            "expected no winner, got {:?}",
            resolution.winner
        )),
        Err(err) => Err(eyre::eyre!("expected a resolution, got error {err:?}")),
    }
}

#[then("the resolution fails with an unresolved tie")]
fn resolution_fails_with_tie(world: &RoundWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_resolution
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing resolution result"))?;
    if !matches!(result, Err(OperationError::TieUnresolved { .. })) {
        return Err(eyre::eyre!("expected TieUnresolved, got {result:?}"));
    }
    Ok(())
}

/// Fetches the given writer's draft through the admin's unredacted view.
fn draft_of(
    world: &RoundWorld,
    author: scriptorium::directory::domain::UserId,
) -> Result<DraftView, eyre::Report> {
    let task_id = world.task_id()?;
    run_async(world.submission.drafts_for_task(world.admin, task_id))
        .map_err(|err| eyre::eyre!("list drafts: {err}"))?
        .into_iter()
        .find(|view| view.author == author)
        .ok_or_else(|| eyre::eyre!("no draft found for the writer"))
}
