//! Service layer for candidate voting sessions.

use crate::access::{require_active_user, require_admin};
use crate::directory::{domain::UserId, ports::UserDirectory};
use crate::draft::{domain::DraftDocument, ports::DraftRepository};
use crate::errors::{OperationError, OperationResult, TallyCount};
use crate::notify::{
    domain::{Notification, NotificationKind},
    ports::Notifier,
};
use crate::voting::{
    domain::{
        Bucket, Candidate, CandidateId, SessionChoice, SessionId, SessionVote, Tally,
        VotingDomainError, VotingSession,
    },
    ports::SessionRepository,
};
use crate::workflow::{
    domain::{RoundNumber, Task, TaskId, TaskStatus},
    ports::WorkflowRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Result of an ended voting session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// The completed session.
    pub session: VotingSession,
    /// Candidates with their final counts and winner flag.
    pub candidates: Vec<Candidate>,
    /// The task after resolution: `completed` with a winner, or
    /// `pending_reassignment` when no candidate satisfied.
    pub task: Task,
    /// The winning draft, absent when no candidate satisfied.
    pub winner: Option<DraftDocument>,
    /// Final counts for every candidate plus "none satisfied".
    pub tally: Vec<TallyCount>,
}

/// Orchestrates session opening, ballot casting, and closure.
#[derive(Clone)]
pub struct SessionVotingService<S, R, W, D, N, C>
where
    S: SessionRepository,
    R: DraftRepository,
    W: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    sessions: Arc<S>,
    drafts: Arc<R>,
    workflow: Arc<W>,
    directory: Arc<D>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<S, R, W, D, N, C> SessionVotingService<S, R, W, D, N, C>
where
    S: SessionRepository,
    R: DraftRepository,
    W: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new session voting service.
    #[must_use]
    pub const fn new(
        sessions: Arc<S>,
        drafts: Arc<R>,
        workflow: Arc<W>,
        directory: Arc<D>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            sessions,
            drafts,
            workflow,
            directory,
            notifier,
            clock,
        }
    }

    /// Opens a voting session over a task's submitted drafts. Admin only.
    ///
    /// Every submitted draft of the current round becomes a candidate and
    /// the task moves to `voting`. A task holds at most one active session
    /// at a time.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Forbidden`] for non-admin actors,
    /// [`OperationError::NotFound`] for unknown tasks,
    /// [`OperationError::InvalidState`] outside `pending_vote`, or
    /// [`OperationError::Validation`] with fewer than two submitted drafts
    /// or a session already open.
    pub async fn open_session(
        &self,
        actor: UserId,
        task_id: TaskId,
        title: impl Into<String> + Send,
    ) -> OperationResult<(VotingSession, Vec<Candidate>)> {
        require_admin(&*self.directory, actor, "open a voting session").await?;
        let mut task = self.find_task(task_id).await?;
        if task.status() != TaskStatus::PendingVote {
            return Err(OperationError::invalid_state(
                "open a voting session",
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
        if submitted.len() < 2 {
            return Err(OperationError::Validation(format!(
                "a voting session needs at least two submitted drafts, found {}",
                submitted.len()
            )));
        }

        let session = VotingSession::open(task_id, task.round(), title, actor, &*self.clock);
        let candidates: Vec<Candidate> = submitted
            .iter()
            .map(|draft| Candidate::new(session.id(), draft.id(), draft.author()))
            .collect();
        task.link_session(session.id(), &*self.clock)?;
        self.sessions.open(&session, &candidates, &task).await?;

        tracing::info!(
            session_id = %session.id(),
            task_id = %task_id,
            candidates = candidates.len(),
            "voting session opened"
        );
        Ok((session, candidates))
    }

    /// Casts one ballot in an active session.
    ///
    /// Eligible voters are active users who are not a writer on the
    /// session's task. Each voter gets exactly one ballot per session.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown sessions,
    /// [`OperationError::InvalidState`] once closed,
    /// [`OperationError::Validation`] for candidates outside the session,
    /// [`OperationError::Forbidden`] for ineligible voters, or
    /// [`OperationError::DuplicateAction`] on a second ballot.
    pub async fn cast_vote(
        &self,
        actor: UserId,
        session_id: SessionId,
        choice: SessionChoice,
    ) -> OperationResult<SessionVote> {
        let session = self.find_session(session_id).await?;
        session.ensure_active()?;
        if let SessionChoice::Candidate(candidate_id) = choice {
            self.ensure_candidate(session_id, candidate_id).await?;
        }
        let task = self.find_task(session.task_id()).await?;
        require_active_user(&*self.directory, actor, "cast a session vote").await?;
        if task.writers().contains(actor) {
            return Err(OperationError::Forbidden {
                action: "vote on a task they are writing",
                actor,
            });
        }

        let vote = SessionVote::new(session_id, actor, choice, self.clock.utc());
        self.sessions.cast(&vote).await?;
        tracing::debug!(session_id = %session_id, "session vote cast");
        Ok(vote)
    }

    /// Returns the live counts for an active or closed session.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown sessions.
    pub async fn current_tally(&self, session_id: SessionId) -> OperationResult<Vec<TallyCount>> {
        self.find_session(session_id).await?;
        let candidates = self.sessions.candidates_for(session_id).await?;
        let tally = self.tally_session(session_id, &candidates).await?;
        Ok(label_session(&tally))
    }

    /// Ends a session, selecting a winner or routing the task to
    /// reassignment. Admin only.
    ///
    /// A strict-majority candidate completes the task, marks its draft
    /// selected, and rejects the other candidates' drafts. A strict
    /// majority for "none satisfied" leaves the drafts untouched and
    /// moves the task to `pending_reassignment`. Ties resolve nothing
    /// and leave the session open for more ballots.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Forbidden`] for non-admin actors,
    /// [`OperationError::NotFound`] for unknown sessions,
    /// [`OperationError::InvalidState`] once closed, or
    /// [`OperationError::TieUnresolved`] with the full tally.
    pub async fn end_session(
        &self,
        actor: UserId,
        session_id: SessionId,
    ) -> OperationResult<SessionOutcome> {
        require_admin(&*self.directory, actor, "end a voting session").await?;
        let mut session = self.find_session(session_id).await?;
        session.ensure_active()?;
        let mut task = self.find_task(session.task_id()).await?;
        let mut candidates = self.sessions.candidates_for(session_id).await?;

        let tally = self.tally_session(session_id, &candidates).await?;
        let counts = label_session(&tally);
        let outcome = match tally.resolve() {
            Ok(bucket) => *bucket,
            Err(tie) => {
                return Err(OperationError::TieUnresolved { tie, tally: counts });
            }
        };

        let winning_candidate = match outcome {
            Bucket::Option(candidate_id) => Some(candidate_id),
            Bucket::NoneSatisfied => None,
        };
        for candidate in &mut candidates {
            let bucket = Bucket::Option(candidate.id());
            candidate.finalize(
                tally.votes_for(&bucket),
                winning_candidate == Some(candidate.id()),
            );
        }

        let (winner, rejected) = match winning_candidate {
            Some(candidate_id) => {
                let (winner, rejected) = self
                    .split_drafts(&candidates, candidate_id, session.round())
                    .await?;
                task.transition_to(TaskStatus::Completed, &*self.clock)?;
                (Some(winner), rejected)
            }
            None => {
                task.transition_to(TaskStatus::PendingReassignment, &*self.clock)?;
                (None, Vec::new())
            }
        };
        session.complete(&*self.clock)?;
        self.sessions
            .close(&session, &candidates, &task, winner.as_ref(), &rejected)
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
            session_id = %session_id,
            task_id = %task.id(),
            status = %task.status(),
            total_votes = tally.total_votes(),
            "voting session ended"
        );
        Ok(SessionOutcome {
            session,
            candidates,
            task,
            winner,
            tally: counts,
        })
    }

    /// Cancels an active session, returning the task to `pending_vote`.
    /// Admin only.
    ///
    /// Cast ballots are retained for audit; reopening the vote means
    /// opening a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Forbidden`] for non-admin actors,
    /// [`OperationError::NotFound`] for unknown sessions, or
    /// [`OperationError::InvalidState`] once closed.
    pub async fn cancel_session(
        &self,
        actor: UserId,
        session_id: SessionId,
    ) -> OperationResult<VotingSession> {
        require_admin(&*self.directory, actor, "cancel a voting session").await?;
        let mut session = self.find_session(session_id).await?;
        session.cancel(&*self.clock)?;
        let mut task = self.find_task(session.task_id()).await?;
        task.unlink_session(&*self.clock)?;
        self.sessions.cancel(&session, &task).await?;
        tracing::info!(session_id = %session_id, task_id = %task.id(), "voting session cancelled");
        Ok(session)
    }

    async fn tally_session(
        &self,
        session_id: SessionId,
        candidates: &[Candidate],
    ) -> OperationResult<Tally<CandidateId>> {
        let options: Vec<CandidateId> = candidates.iter().map(Candidate::id).collect();
        let ballots: Vec<Bucket<CandidateId>> = self
            .sessions
            .votes_for_session(session_id)
            .await?
            .iter()
            .map(|vote| vote.choice().into())
            .collect();
        Ok(Tally::count(&options, &ballots))
    }

    /// Splits the round's live drafts into the winner and the rejected
    /// rest, status changes applied.
    async fn split_drafts(
        &self,
        candidates: &[Candidate],
        winning_candidate: CandidateId,
        round: RoundNumber,
    ) -> OperationResult<(DraftDocument, Vec<DraftDocument>)> {
        let winning_document = candidates
            .iter()
            .find(|candidate| candidate.id() == winning_candidate)
            .map(Candidate::document_id)
            .ok_or_else(|| {
                OperationError::Validation("winning candidate is not in the session".to_owned())
            })?;

        let mut winner = None;
        let mut rejected = Vec::new();
        for candidate in candidates {
            let mut draft = self
                .drafts
                .find_by_id(candidate.document_id())
                .await?
                .ok_or(OperationError::NotFound {
                    entity: "draft",
                    id: candidate.document_id().into_inner(),
                })?;
            if draft.round() != round {
                continue;
            }
            if draft.id() == winning_document {
                draft.mark_selected(&*self.clock)?;
                winner = Some(draft);
            } else {
                draft.mark_rejected(&*self.clock)?;
                rejected.push(draft);
            }
        }
        winner
            .map(|draft| (draft, rejected))
            .ok_or_else(|| {
                OperationError::Validation("winning draft is no longer available".to_owned())
            })
    }

    async fn ensure_candidate(
        &self,
        session_id: SessionId,
        candidate_id: CandidateId,
    ) -> OperationResult<()> {
        let known = self
            .sessions
            .candidates_for(session_id)
            .await?
            .iter()
            .any(|candidate| candidate.id() == candidate_id);
        if known {
            Ok(())
        } else {
            Err(VotingDomainError::UnknownCandidate {
                session_id,
                candidate_id,
            }
            .into())
        }
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

    async fn find_session(&self, session_id: SessionId) -> OperationResult<VotingSession> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or(OperationError::NotFound {
                entity: "session",
                id: session_id.into_inner(),
            })
    }
}

/// Labels a session tally with candidate ids and "none satisfied".
fn label_session(tally: &Tally<CandidateId>) -> Vec<TallyCount> {
    tally
        .entries()
        .iter()
        .map(|entry| TallyCount {
            label: match entry.bucket {
                Bucket::Option(candidate_id) => candidate_id.to_string(),
                Bucket::NoneSatisfied => "none_satisfied".to_owned(),
            },
            votes: entry.votes,
        })
        .collect()
}
