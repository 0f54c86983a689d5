//! Service orchestration tests for the binary per-task vote.

use std::sync::Arc;

use chrono::Duration;
use rstest::{fixture, rstest};

use crate::draft::domain::DraftStatus;
use crate::draft::ports::DraftRepository;
use crate::draft::services::SubmissionService;
use crate::errors::OperationError;
use crate::notify::domain::NotificationKind;
use crate::test_support::{FixedClock, World, passing_draft_request};
use crate::voting::domain::BinaryChoice;
use crate::workflow::domain::{TaskId, TaskStatus};

#[fixture]
fn world() -> World {
    World::new().expect("world fixture")
}

/// Creates a task with both drafts submitted, leaving it in `pending_vote`.
async fn pending_vote_task(world: &World) -> eyre::Result<TaskId> {
    let task = world.create_accepted_task().await?;
    world.submit_passing_draft(task.id(), world.writer1).await?;
    world.submit_passing_draft(task.id(), world.writer2).await?;
    Ok(task.id())
}

async fn draft_status_of(
    world: &World,
    task_id: TaskId,
    author: crate::directory::domain::UserId,
) -> eyre::Result<DraftStatus> {
    let drafts = world.draft_repository();
    drafts
        .find_by_task(task_id)
        .await?
        .into_iter()
        .find(|draft| draft.author() == author)
        .map(|draft| draft.status())
        .ok_or_else(|| eyre::eyre!("draft missing for author"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn votes_are_only_accepted_while_pending_vote(world: World) -> eyre::Result<()> {
    let task = world.create_accepted_task().await?;
    let result = world
        .binary_voting_service()
        .cast_vote(world.voters[0], task.id(), BinaryChoice::VersionA, None)
        .await;
    assert!(matches!(result, Err(OperationError::InvalidState { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn writers_may_not_vote_on_their_own_task(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let result = world
        .binary_voting_service()
        .cast_vote(world.writer1, task_id, BinaryChoice::VersionB, None)
        .await;
    assert!(matches!(result, Err(OperationError::Forbidden { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_voter_gets_exactly_one_ballot(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.binary_voting_service();
    service
        .cast_vote(world.voters[0], task_id, BinaryChoice::VersionA, None)
        .await?;
    let second = service
        .cast_vote(
            world.voters[0],
            task_id,
            BinaryChoice::VersionB,
            Some("changed my mind".to_owned()),
        )
        .await;
    assert!(matches!(second, Err(OperationError::DuplicateAction { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn the_tally_reports_all_three_choices(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.binary_voting_service();
    service
        .cast_vote(world.voters[0], task_id, BinaryChoice::VersionA, None)
        .await?;
    service
        .cast_vote(world.voters[1], task_id, BinaryChoice::VersionA, None)
        .await?;
    service
        .cast_vote(
            world.voters[2],
            task_id,
            BinaryChoice::NeitherSatisfactory,
            None,
        )
        .await?;

    let tally = service.current_tally(task_id).await?;
    assert_eq!(tally.len(), 3);
    assert_eq!(tally[0].label, "version_a");
    assert_eq!(tally[0].votes, 2);
    assert_eq!(tally[1].label, "version_b");
    assert_eq!(tally[1].votes, 0);
    assert_eq!(tally[2].label, "neither_satisfactory");
    assert_eq!(tally[2].votes, 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_version_a_majority_completes_the_task(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.binary_voting_service();
    service
        .cast_vote(world.voters[0], task_id, BinaryChoice::VersionA, None)
        .await?;
    service
        .cast_vote(world.voters[1], task_id, BinaryChoice::VersionA, None)
        .await?;
    service
        .cast_vote(
            world.voters[2],
            task_id,
            BinaryChoice::NeitherSatisfactory,
            None,
        )
        .await?;

    let resolution = service.resolve(world.admin, task_id).await?;
    assert_eq!(resolution.task.status(), TaskStatus::Completed);
    let winner = resolution.winner.ok_or_else(|| eyre::eyre!("expected a winner"))?;
    assert_eq!(winner.author(), world.writer1);
    assert_eq!(winner.status(), DraftStatus::Selected);

    assert_eq!(
        draft_status_of(&world, task_id, world.writer1).await?,
        DraftStatus::Selected
    );
    assert_eq!(
        draft_status_of(&world, task_id, world.writer2).await?,
        DraftStatus::Rejected
    );

    let resolved: Vec<_> = world
        .notifier
        .sent()?
        .into_iter()
        .filter(|notice| notice.kind() == NotificationKind::VotingResolved)
        .collect();
    assert_eq!(resolved.len(), 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_neither_majority_routes_the_task_to_reassignment(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.binary_voting_service();
    for voter in [world.voters[0], world.voters[1]] {
        service
            .cast_vote(voter, task_id, BinaryChoice::NeitherSatisfactory, None)
            .await?;
    }
    service
        .cast_vote(world.voters[2], task_id, BinaryChoice::VersionB, None)
        .await?;

    let resolution = service.resolve(world.admin, task_id).await?;
    assert_eq!(resolution.task.status(), TaskStatus::PendingReassignment);
    assert_eq!(resolution.winner, None);
    assert_eq!(
        draft_status_of(&world, task_id, world.writer1).await?,
        DraftStatus::Rejected
    );
    assert_eq!(
        draft_status_of(&world, task_id, world.writer2).await?,
        DraftStatus::Rejected
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_tie_resolves_nothing_and_keeps_the_vote_open(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.binary_voting_service();
    service
        .cast_vote(world.voters[0], task_id, BinaryChoice::VersionA, None)
        .await?;
    service
        .cast_vote(world.voters[1], task_id, BinaryChoice::VersionB, None)
        .await?;

    let result = service.resolve(world.admin, task_id).await;
    let Err(OperationError::TieUnresolved { tie, tally }) = result else {
        panic!("expected an unresolved tie");
    };
    assert_eq!(tie.votes, 1);
    assert_eq!(tie.contenders, 2);
    assert_eq!(tally.len(), 3);

    // Task and drafts are untouched; a late ballot can still break the tie.
    service
        .cast_vote(world.voters[2], task_id, BinaryChoice::VersionA, None)
        .await?;
    let resolution = service.resolve(world.admin, task_id).await?;
    assert_eq!(resolution.task.status(), TaskStatus::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolution_requires_an_admin_actor(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let result = world
        .binary_voting_service()
        .resolve(world.voters[0], task_id)
        .await;
    assert!(matches!(result, Err(OperationError::Forbidden { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolution_needs_both_versions_on_the_table(world: World) -> eyre::Result<()> {
    // A single submission reaching pending_vote via the deadline leaves
    // only one version, which the binary vote cannot arbitrate.
    let task = world.create_accepted_task().await?;
    let late_clock = Arc::new(FixedClock::at(world.now() + Duration::days(8)));
    let submission = SubmissionService::new(
        world.draft_repository(),
        world.workflow_repository(),
        world.directory.clone(),
        world.notifier.clone(),
        late_clock,
    );
    let draft = submission
        .save_draft(world.writer1, passing_draft_request(task.id()))
        .await?;
    submission.submit_draft(world.writer1, draft.id()).await?;

    let service = world.binary_voting_service();
    service
        .cast_vote(world.voters[0], task.id(), BinaryChoice::VersionA, None)
        .await?;
    let result = service.resolve(world.admin, task.id()).await;
    assert!(matches!(result, Err(OperationError::Validation(_))));
    Ok(())
}
