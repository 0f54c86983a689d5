//! Service orchestration tests for candidate voting sessions.

use chrono::Duration;
use rstest::{fixture, rstest};
use std::sync::Arc;

use crate::draft::domain::DraftStatus;
use crate::draft::ports::DraftRepository;
use crate::draft::services::SubmissionService;
use crate::errors::OperationError;
use crate::test_support::{FixedClock, World, passing_draft_request};
use crate::voting::domain::{Candidate, CandidateId, SessionChoice, SessionStatus};
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

fn candidate_of(candidates: &[Candidate], author: crate::directory::domain::UserId) -> CandidateId {
    candidates
        .iter()
        .find(|candidate| candidate.author() == author)
        .map(Candidate::id)
        .expect("each writer has a candidate")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn opening_a_session_registers_candidates_and_moves_the_task(
    world: World,
) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.session_voting_service();

    let (session, candidates) = service
        .open_session(world.admin, task_id, "Round one vote")
        .await?;

    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(session.task_id(), task_id);
    assert_eq!(candidates.len(), 2);
    let authors: Vec<_> = candidates.iter().map(Candidate::author).collect();
    assert!(authors.contains(&world.writer1));
    assert!(authors.contains(&world.writer2));

    let task = world
        .lifecycle_service()
        .find_task(task_id)
        .await?
        .ok_or_else(|| eyre::eyre!("task vanished"))?;
    assert_eq!(task.status(), TaskStatus::Voting);
    assert_eq!(task.voting_session(), Some(session.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn opening_needs_at_least_two_submitted_drafts(world: World) -> eyre::Result<()> {
    // A lone submission reaching pending_vote via the deadline leaves
    // nothing to vote between, so the session must not open.
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

    let result = world
        .session_voting_service()
        .open_session(world.admin, task.id(), "Round one vote")
        .await;
    assert!(matches!(result, Err(OperationError::Validation(_))));

    let stored = world
        .lifecycle_service()
        .find_task(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task vanished"))?;
    assert_eq!(stored.status(), TaskStatus::PendingVote);
    assert_eq!(stored.voting_session(), None);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn opening_requires_an_admin_actor(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let result = world
        .session_voting_service()
        .open_session(world.voters[0], task_id, "Round one vote")
        .await;
    assert!(matches!(result, Err(OperationError::Forbidden { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn opening_requires_a_task_pending_vote(world: World) -> eyre::Result<()> {
    let task = world.create_accepted_task().await?;
    let result = world
        .session_voting_service()
        .open_session(world.admin, task.id(), "Round one vote")
        .await;
    assert!(matches!(result, Err(OperationError::InvalidState { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ballots_must_name_a_candidate_of_the_session(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.session_voting_service();
    let (session, _) = service
        .open_session(world.admin, task_id, "Round one vote")
        .await?;

    let result = service
        .cast_vote(
            world.voters[0],
            session.id(),
            SessionChoice::Candidate(CandidateId::new()),
        )
        .await;
    assert!(matches!(result, Err(OperationError::Validation(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn writers_may_not_vote_in_their_own_session(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.session_voting_service();
    let (session, _) = service
        .open_session(world.admin, task_id, "Round one vote")
        .await?;

    let result = service
        .cast_vote(world.writer2, session.id(), SessionChoice::NoneSatisfied)
        .await;
    assert!(matches!(result, Err(OperationError::Forbidden { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_voter_gets_exactly_one_ballot_per_session(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.session_voting_service();
    let (session, candidates) = service
        .open_session(world.admin, task_id, "Round one vote")
        .await?;
    let first_candidate = candidate_of(&candidates, world.writer1);

    service
        .cast_vote(
            world.voters[0],
            session.id(),
            SessionChoice::Candidate(first_candidate),
        )
        .await?;
    let second = service
        .cast_vote(world.voters[0], session.id(), SessionChoice::NoneSatisfied)
        .await;
    assert!(matches!(second, Err(OperationError::DuplicateAction { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_majority_candidate_wins_the_session(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.session_voting_service();
    let (session, candidates) = service
        .open_session(world.admin, task_id, "Round one vote")
        .await?;
    let favourite = candidate_of(&candidates, world.writer1);

    for voter in [world.voters[0], world.voters[1]] {
        service
            .cast_vote(voter, session.id(), SessionChoice::Candidate(favourite))
            .await?;
    }
    service
        .cast_vote(world.voters[2], session.id(), SessionChoice::NoneSatisfied)
        .await?;

    let outcome = service.end_session(world.admin, session.id()).await?;
    assert_eq!(outcome.session.status(), SessionStatus::Completed);
    assert_eq!(outcome.task.status(), TaskStatus::Completed);

    let winner = outcome.winner.ok_or_else(|| eyre::eyre!("expected a winner"))?;
    assert_eq!(winner.author(), world.writer1);
    assert_eq!(winner.status(), DraftStatus::Selected);

    let winning_candidate = outcome
        .candidates
        .iter()
        .find(|candidate| candidate.id() == favourite)
        .ok_or_else(|| eyre::eyre!("candidate missing"))?;
    assert!(winning_candidate.is_winner());
    assert_eq!(winning_candidate.vote_count(), 2);

    let drafts = world.draft_repository();
    let rejected = drafts
        .find_by_task(task_id)
        .await?
        .into_iter()
        .find(|draft| draft.author() == world.writer2)
        .ok_or_else(|| eyre::eyre!("draft missing"))?;
    assert_eq!(rejected.status(), DraftStatus::Rejected);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_none_satisfied_majority_leaves_drafts_untouched(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.session_voting_service();
    let (session, _) = service
        .open_session(world.admin, task_id, "Round one vote")
        .await?;

    for voter in world.voters {
        service
            .cast_vote(voter, session.id(), SessionChoice::NoneSatisfied)
            .await?;
    }

    let outcome = service.end_session(world.admin, session.id()).await?;
    assert_eq!(outcome.task.status(), TaskStatus::PendingReassignment);
    assert_eq!(outcome.winner, None);

    // Drafts stay submitted for the audit trail until reassignment purges
    // the round.
    let drafts = world.draft_repository();
    for draft in drafts.find_by_task(task_id).await? {
        assert_eq!(draft.status(), DraftStatus::Submitted);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_tie_keeps_the_session_open(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.session_voting_service();
    let (session, candidates) = service
        .open_session(world.admin, task_id, "Round one vote")
        .await?;
    let favourite = candidate_of(&candidates, world.writer1);

    service
        .cast_vote(
            world.voters[0],
            session.id(),
            SessionChoice::Candidate(favourite),
        )
        .await?;
    service
        .cast_vote(world.voters[1], session.id(), SessionChoice::NoneSatisfied)
        .await?;

    let result = service.end_session(world.admin, session.id()).await;
    let Err(OperationError::TieUnresolved { tie, tally }) = result else {
        panic!("expected an unresolved tie");
    };
    assert_eq!(tie.votes, 1);
    assert_eq!(tie.contenders, 2);
    assert!(tally.iter().any(|count| count.label == "none_satisfied"));

    // Still active: a late ballot can break the tie.
    service
        .cast_vote(
            world.voters[2],
            session.id(),
            SessionChoice::Candidate(favourite),
        )
        .await?;
    let outcome = service.end_session(world.admin, session.id()).await?;
    assert_eq!(outcome.task.status(), TaskStatus::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelling_returns_the_task_to_pending_vote(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.session_voting_service();
    let (session, candidates) = service
        .open_session(world.admin, task_id, "Round one vote")
        .await?;
    service
        .cast_vote(
            world.voters[0],
            session.id(),
            SessionChoice::Candidate(candidate_of(&candidates, world.writer2)),
        )
        .await?;

    let cancelled = service.cancel_session(world.admin, session.id()).await?;
    assert_eq!(cancelled.status(), SessionStatus::Cancelled);

    let task = world
        .lifecycle_service()
        .find_task(task_id)
        .await?
        .ok_or_else(|| eyre::eyre!("task vanished"))?;
    assert_eq!(task.status(), TaskStatus::PendingVote);
    assert_eq!(task.voting_session(), None);

    // Ballots stay recorded for audit, but a fresh session starts clean.
    let state = world.db.read()?;
    assert_eq!(state.session_votes.len(), 1);
    drop(state);

    let (fresh, _) = service
        .open_session(world.admin, task_id, "Round one, retake")
        .await?;
    assert_ne!(fresh.id(), session.id());
    assert_eq!(service.current_tally(fresh.id()).await?.iter().map(|c| c.votes).sum::<u32>(), 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_sessions_reject_further_ballots(world: World) -> eyre::Result<()> {
    let task_id = pending_vote_task(&world).await?;
    let service = world.session_voting_service();
    let (session, _) = service
        .open_session(world.admin, task_id, "Round one vote")
        .await?;
    service.cancel_session(world.admin, session.id()).await?;

    let result = service
        .cast_vote(world.voters[0], session.id(), SessionChoice::NoneSatisfied)
        .await;
    assert!(matches!(result, Err(OperationError::InvalidState { .. })));
    Ok(())
}
