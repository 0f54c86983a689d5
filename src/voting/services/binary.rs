//! Service layer for the binary per-task vote.

use crate::access::{require_active_user, require_admin};
use crate::directory::{domain::UserId, ports::UserDirectory};
use crate::draft::{domain::DraftDocument, ports::DraftRepository};
use crate::errors::{OperationError, OperationResult, TallyCount};
use crate::notify::{
    domain::{Notification, NotificationKind},
    ports::Notifier,
};
use crate::voting::{
    domain::{BinaryChoice, BinaryVote, Bucket, Tally},
    ports::BinaryVoteRepository,
};
use crate::workflow::{
    domain::{Task, TaskId, TaskStatus},
    ports::WorkflowRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Result of a resolved binary vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryResolution {
    /// The task after resolution: `completed` with a winner, or
    /// `pending_reassignment` when neither version satisfied.
    pub task: Task,
    /// The winning draft, absent when neither version satisfied.
    pub winner: Option<DraftDocument>,
    /// Final counts for all three choices.
    pub tally: Vec<TallyCount>,
}

/// Orchestrates ballot casting and resolution for binary votes.
#[derive(Clone)]
pub struct BinaryVotingService<B, R, W, D, N, C>
where
    B: BinaryVoteRepository,
    R: DraftRepository,
    W: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    votes: Arc<B>,
    drafts: Arc<R>,
    workflow: Arc<W>,
    directory: Arc<D>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<B, R, W, D, N, C> BinaryVotingService<B, R, W, D, N, C>
where
    B: BinaryVoteRepository,
    R: DraftRepository,
    W: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new binary voting service.
    #[must_use]
    pub const fn new(
        votes: Arc<B>,
        drafts: Arc<R>,
        workflow: Arc<W>,
        directory: Arc<D>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            votes,
            drafts,
            workflow,
            directory,
            notifier,
            clock,
        }
    }

    /// Casts one ballot on a task awaiting its vote.
    ///
    /// Eligible voters are active users who are not a writer on the task.
    /// Each voter gets exactly one ballot.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown tasks,
    /// [`OperationError::InvalidState`] outside `pending_vote`,
    /// [`OperationError::Forbidden`] for ineligible voters, or
    /// [`OperationError::DuplicateAction`] on a second ballot.
    pub async fn cast_vote(
        &self,
        actor: UserId,
        task_id: TaskId,
        choice: BinaryChoice,
        comment: Option<String>,
    ) -> OperationResult<BinaryVote> {
        let task = self.find_task(task_id).await?;
        if task.status() != TaskStatus::PendingVote {
            return Err(OperationError::invalid_state(
                "cast a binary vote",
                task.status().as_str(),
            ));
        }
        require_active_user(&*self.directory, actor, "cast a binary vote").await?;
        if task.writers().contains(actor) {
            return Err(OperationError::Forbidden {
                action: "vote on a task they are writing",
                actor,
            });
        }

        let vote = BinaryVote::new(task_id, actor, choice, comment, self.clock.utc());
        self.votes.cast(&vote).await?;
        tracing::debug!(task_id = %task_id, choice = %choice, "binary vote cast");
        Ok(vote)
    }

    /// Returns the live counts for a task's binary vote.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown tasks.
    pub async fn current_tally(&self, task_id: TaskId) -> OperationResult<Vec<TallyCount>> {
        self.find_task(task_id).await?;
        let ballots: Vec<Bucket<BinaryChoice>> = self
            .votes
            .votes_for_task(task_id)
            .await?
            .iter()
            .map(|vote| vote.choice().into())
            .collect();
        let tally = Tally::count(&[BinaryChoice::VersionA, BinaryChoice::VersionB], &ballots);
        Ok(label_binary(&tally))
    }

    /// Resolves a task's binary vote, selecting a winner or routing the
    /// task to reassignment. Admin only.
    ///
    /// The first writer's submitted draft is version A, the second's is
    /// version B. A strict-majority winner completes the task and marks
    /// the drafts; a strict majority for "neither" rejects both drafts
    /// and moves the task to `pending_reassignment`. Ties resolve
    /// nothing and leave the task open for more ballots.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Forbidden`] for non-admin actors,
    /// [`OperationError::InvalidState`] outside `pending_vote`,
    /// [`OperationError::Validation`] without exactly two submitted
    /// drafts, or [`OperationError::TieUnresolved`] with the full tally.
    pub async fn resolve(&self, actor: UserId, task_id: TaskId) -> OperationResult<BinaryResolution> {
        require_admin(&*self.directory, actor, "resolve a binary vote").await?;
        let mut task = self.find_task(task_id).await?;
        if task.status() != TaskStatus::PendingVote {
            return Err(OperationError::invalid_state(
                "resolve a binary vote",
                task.status().as_str(),
            ));
        }

        let submitted: Vec<DraftDocument> = self
            .drafts
            .find_by_task(task_id)
            .await?
            .into_iter()
            .filter(|draft| draft.round() == task.round() && draft.is_submitted())
            .collect();
        let [version_a, version_b] = locate_versions(&task, submitted)?;

        let ballots: Vec<Bucket<BinaryChoice>> = self
            .votes
            .votes_for_task(task_id)
            .await?
            .iter()
            .map(|vote| vote.choice().into())
            .collect();
        let tally = Tally::count(&[BinaryChoice::VersionA, BinaryChoice::VersionB], &ballots);
        let counts = label_binary(&tally);
        let outcome = match tally.resolve() {
            Ok(bucket) => *bucket,
            Err(tie) => {
                return Err(OperationError::TieUnresolved { tie, tally: counts });
            }
        };

        let (winner, mut rejected) = match outcome {
            Bucket::Option(BinaryChoice::VersionA) => (Some(version_a), vec![version_b]),
            Bucket::Option(BinaryChoice::VersionB) => (Some(version_b), vec![version_a]),
            Bucket::Option(BinaryChoice::NeitherSatisfactory) | Bucket::NoneSatisfied => {
                (None, vec![version_a, version_b])
            }
        };
        let winner = match winner {
            Some(mut draft) => {
                draft.mark_selected(&*self.clock)?;
                task.transition_to(TaskStatus::Completed, &*self.clock)?;
                Some(draft)
            }
            None => {
                task.transition_to(TaskStatus::PendingReassignment, &*self.clock)?;
                None
            }
        };
        for draft in &mut rejected {
            draft.mark_rejected(&*self.clock)?;
        }

        self.votes
            .record_resolution(&task, winner.as_ref(), &rejected)
            .await?;

        let notices = task
            .writers()
            .both()
            .into_iter()
            .map(|writer| {
                Notification::new(
                    writer,
                    NotificationKind::VotingResolved,
                    format!("voting on '{}' has been resolved", task.title()),
                )
            })
            .collect();
        self.notifier.enqueue_all(notices).await?;

        tracing::info!(
            task_id = %task_id,
            status = %task.status(),
            total_votes = tally.total_votes(),
            "binary vote resolved"
        );
        Ok(BinaryResolution {
            task,
            winner,
            tally: counts,
        })
    }

    async fn find_task(&self, task_id: TaskId) -> OperationResult<Task> {
        self.workflow
            .find_by_id(task_id)
            .await?
            .ok_or(OperationError::NotFound {
                entity: "task",
                id: task_id.into_inner(),
            })
    }
}

/// Maps the round's submitted drafts onto versions A and B by authorship.
fn locate_versions(
    task: &Task,
    submitted: Vec<DraftDocument>,
) -> OperationResult<[DraftDocument; 2]> {
    if submitted.len() != 2 {
        return Err(OperationError::Validation(format!(
            "binary resolution requires exactly two submitted drafts, found {}",
            submitted.len()
        )));
    }
    let mut version_a = None;
    let mut version_b = None;
    for draft in submitted {
        if draft.author() == task.writers().writer1() {
            version_a = Some(draft);
        } else if draft.author() == task.writers().writer2() {
            version_b = Some(draft);
        }
    }
    match (version_a, version_b) {
        (Some(a), Some(b)) => Ok([a, b]),
        _ => Err(OperationError::Validation(
            "submitted drafts do not map onto the task's writer pair".to_owned(),
        )),
    }
}

/// Labels a binary tally with the choices' storage names.
fn label_binary(tally: &Tally<BinaryChoice>) -> Vec<TallyCount> {
    tally
        .entries()
        .iter()
        .map(|entry| TallyCount {
            label: match entry.bucket {
                Bucket::Option(choice) => choice.as_str().to_owned(),
                Bucket::NoneSatisfied => BinaryChoice::NeitherSatisfactory.as_str().to_owned(),
            },
            votes: entry.votes,
        })
        .collect()
}
