//! Task aggregate root and related lifecycle types.

use super::{FunctionRef, RoundNumber, TaskId, TaskStatus, WorkflowDomainError};
use crate::directory::domain::UserId;
use crate::voting::domain::SessionId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The two competing writer assignments of a task.
///
/// Constructing the pair validates distinctness, so a task with
/// `writer1 == writer2` is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterPair {
    writer1: UserId,
    writer2: UserId,
}

impl WriterPair {
    /// Creates a validated writer pair.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::IdenticalWriters`] when both slots
    /// name the same user.
    pub fn new(writer1: UserId, writer2: UserId) -> Result<Self, WorkflowDomainError> {
        if writer1 == writer2 {
            return Err(WorkflowDomainError::IdenticalWriters(writer1));
        }
        Ok(Self { writer1, writer2 })
    }

    /// Returns the first writer.
    #[must_use]
    pub const fn writer1(&self) -> UserId {
        self.writer1
    }

    /// Returns the second writer.
    #[must_use]
    pub const fn writer2(&self) -> UserId {
        self.writer2
    }

    /// Returns whether the given user occupies either slot.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.writer1 == user || self.writer2 == user
    }

    /// Returns both writers in slot order.
    #[must_use]
    pub const fn both(&self) -> [UserId; 2] {
        [self.writer1, self.writer2]
    }
}

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskParams {
    /// Function under documentation.
    pub function_ref: FunctionRef,
    /// Human-readable task title.
    pub title: String,
    /// Longer task description.
    pub description: String,
    /// Code annotator assignment.
    pub annotator: UserId,
    /// Competing writer assignments.
    pub writers: WriterPair,
    /// Admin who created the task.
    pub assigned_by: UserId,
    /// Optional submission deadline.
    pub deadline: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted function reference.
    pub function_ref: FunctionRef,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted annotator assignment.
    pub annotator: UserId,
    /// Persisted writer pair.
    pub writers: WriterPair,
    /// Persisted creator.
    pub assigned_by: UserId,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted voting session link, if any.
    pub voting_session: Option<SessionId>,
    /// Persisted round counter.
    pub round: RoundNumber,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    function_ref: FunctionRef,
    title: String,
    description: String,
    annotator: UserId,
    writers: WriterPair,
    assigned_by: UserId,
    deadline: Option<DateTime<Utc>>,
    status: TaskStatus,
    voting_session: Option<SessionId>,
    round: RoundNumber,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in `NotStarted` status, round one.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyTitle`] for a blank title,
    /// [`WorkflowDomainError::WriterIsAnnotator`] when a writer slot names
    /// the annotator, or [`WorkflowDomainError::DeadlineNotFuture`] when a
    /// supplied deadline is not after the current clock reading.
    pub fn create(params: NewTaskParams, clock: &impl Clock) -> Result<Self, WorkflowDomainError> {
        let timestamp = clock.utc();
        let title = params.title.trim().to_owned();
        if title.is_empty() {
            return Err(WorkflowDomainError::EmptyTitle);
        }
        if params.writers.contains(params.annotator) {
            return Err(WorkflowDomainError::WriterIsAnnotator(params.annotator));
        }
        if let Some(deadline) = params.deadline {
            ensure_future(deadline, timestamp)?;
        }

        Ok(Self {
            id: TaskId::new(),
            function_ref: params.function_ref,
            title,
            description: params.description,
            annotator: params.annotator,
            writers: params.writers,
            assigned_by: params.assigned_by,
            deadline: params.deadline,
            status: TaskStatus::NotStarted,
            voting_session: None,
            round: RoundNumber::FIRST,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            function_ref: data.function_ref,
            title: data.title,
            description: data.description,
            annotator: data.annotator,
            writers: data.writers,
            assigned_by: data.assigned_by,
            deadline: data.deadline,
            status: data.status,
            voting_session: data.voting_session,
            round: data.round,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the function under documentation.
    #[must_use]
    pub const fn function_ref(&self) -> &FunctionRef {
        &self.function_ref
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the code annotator assignment.
    #[must_use]
    pub const fn annotator(&self) -> UserId {
        self.annotator
    }

    /// Returns the current writer pair.
    #[must_use]
    pub const fn writers(&self) -> &WriterPair {
        &self.writers
    }

    /// Returns the admin who created the task.
    #[must_use]
    pub const fn assigned_by(&self) -> UserId {
        self.assigned_by
    }

    /// Returns the submission deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the linked voting session, if any.
    #[must_use]
    pub const fn voting_session(&self) -> Option<SessionId> {
        self.voting_session
    }

    /// Returns the current assignment round.
    #[must_use]
    pub const fn round(&self) -> RoundNumber {
        self.round
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the deadline has passed at the current clock reading.
    ///
    /// Overtime is derived, never stored; tasks without a deadline are
    /// never overdue.
    #[must_use]
    pub fn is_overdue(&self, clock: &impl Clock) -> bool {
        self.deadline.is_some_and(|deadline| clock.utc() > deadline)
    }

    /// Moves the task to `target` if the transition table permits it.
    ///
    /// On rejection the task is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidStatusTransition`] for any
    /// move outside the table.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), WorkflowDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(WorkflowDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Records a writer accepting the task, moving it to `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::NotAnAssignedWriter`] when the actor
    /// is not one of the writer pair, or
    /// [`WorkflowDomainError::InvalidStatusTransition`] outside
    /// `NotStarted`.
    pub fn accept(&mut self, actor: UserId, clock: &impl Clock) -> Result<(), WorkflowDomainError> {
        if !self.writers.contains(actor) {
            return Err(WorkflowDomainError::NotAnAssignedWriter {
                task_id: self.id,
                actor,
            });
        }
        self.transition_to(TaskStatus::InProgress, clock)
    }

    /// Links an opened voting session, moving the task to `Voting`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidStatusTransition`] outside
    /// `PendingVote`.
    pub fn link_session(
        &mut self,
        session: SessionId,
        clock: &impl Clock,
    ) -> Result<(), WorkflowDomainError> {
        self.transition_to(TaskStatus::Voting, clock)?;
        self.voting_session = Some(session);
        Ok(())
    }

    /// Clears a cancelled session link, returning the task to `PendingVote`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidStatusTransition`] outside
    /// `Voting`.
    pub fn unlink_session(&mut self, clock: &impl Clock) -> Result<(), WorkflowDomainError> {
        self.transition_to(TaskStatus::PendingVote, clock)?;
        self.voting_session = None;
        Ok(())
    }

    /// Starts a new assignment round after reassignment.
    ///
    /// Resets status to `NotStarted`, swaps in the new writer pair and
    /// deadline, clears the session link, and bumps the round counter.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidStatusTransition`] outside
    /// `PendingReassignment`, [`WorkflowDomainError::WriterIsAnnotator`]
    /// when a new writer is the annotator, or
    /// [`WorkflowDomainError::DeadlineNotFuture`] for a stale deadline.
    pub fn start_new_round(
        &mut self,
        new_writers: WriterPair,
        new_deadline: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<RoundNumber, WorkflowDomainError> {
        if new_writers.contains(self.annotator) {
            return Err(WorkflowDomainError::WriterIsAnnotator(self.annotator));
        }
        ensure_future(new_deadline, clock.utc())?;
        let next_round = self.round.next()?;
        self.transition_to(TaskStatus::NotStarted, clock)?;
        self.writers = new_writers;
        self.deadline = Some(new_deadline);
        self.voting_session = None;
        self.round = next_round;
        Ok(next_round)
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Validates that `deadline` is strictly after `now`.
fn ensure_future(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), WorkflowDomainError> {
    if deadline <= now {
        return Err(WorkflowDomainError::DeadlineNotFuture { deadline, now });
    }
    Ok(())
}
