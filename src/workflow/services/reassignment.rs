//! Service layer for atomic writer reassignment.

use crate::access::{require_admin, require_assignable_writer};
use crate::directory::{domain::UserId, ports::UserDirectory};
use crate::errors::{OperationError, OperationResult};
use crate::notify::{
    domain::{Notification, NotificationKind},
    ports::Notifier,
};
use crate::workflow::{
    domain::{ReassignmentRecord, ReassignmentSnapshot, RoundNumber, Task, TaskId, WriterPair},
    ports::WorkflowRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for reassigning a task to a fresh writer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignTaskRequest {
    /// Task to reassign.
    pub task_id: TaskId,
    /// First writer of the new pair.
    pub new_writer1: UserId,
    /// Second writer of the new pair.
    pub new_writer2: UserId,
    /// Deadline for the new round.
    pub new_deadline: DateTime<Utc>,
    /// Optional free-text reason recorded in the audit trail.
    pub reason: Option<String>,
}

/// Result of a completed reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentOutcome {
    /// Task after the reset, back in `not_started`.
    pub task: Task,
    /// Round number the reassignment opened.
    pub round: RoundNumber,
}

/// Orchestrates the all-or-nothing reassignment procedure.
#[derive(Clone)]
pub struct ReassignmentService<R, D, N, C>
where
    R: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<D>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, D, N, C> ReassignmentService<R, D, N, C>
where
    R: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new reassignment service.
    #[must_use]
    pub const fn new(repository: Arc<R>, directory: Arc<D>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            notifier,
            clock,
        }
    }

    /// Rotates a task in `pending_reassignment` to a new writer pair.
    ///
    /// Validates the request before touching storage, then resets the
    /// task, appends the audit record, and purges the closed round's
    /// artifacts in a single repository unit. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Validation`] for an invalid writer pair
    /// or deadline, [`OperationError::Forbidden`] for non-admin actors,
    /// [`OperationError::NotFound`] for unknown tasks, or
    /// [`OperationError::InvalidState`] outside `pending_reassignment`.
    pub async fn reassign_task(
        &self,
        actor: UserId,
        request: ReassignTaskRequest,
    ) -> OperationResult<ReassignmentOutcome> {
        let new_writers = WriterPair::new(request.new_writer1, request.new_writer2)?;
        require_admin(&*self.directory, actor, "reassign a task").await?;
        require_assignable_writer(&*self.directory, request.new_writer1).await?;
        require_assignable_writer(&*self.directory, request.new_writer2).await?;

        let mut task = self
            .repository
            .find_by_id(request.task_id)
            .await?
            .ok_or(OperationError::NotFound {
                entity: "task",
                id: request.task_id.into_inner(),
            })?;

        let previous_writers = *task.writers();
        let previous_deadline = task.deadline();
        let round = task.start_new_round(new_writers, request.new_deadline, &*self.clock)?;

        let record = ReassignmentRecord::from_snapshot(ReassignmentSnapshot {
            task_id: task.id(),
            round,
            previous_writers,
            new_writers,
            previous_deadline,
            new_deadline: request.new_deadline,
            reassigned_by: actor,
            reason: request.reason,
            recorded_at: self.clock.utc(),
        });
        self.repository.reassign(&task, &record).await?;

        let notices = new_writers
            .both()
            .into_iter()
            .map(|writer| {
                Notification::new(
                    writer,
                    NotificationKind::TaskReassigned,
                    format!("you were assigned to round {round} of '{}'", task.title()),
                )
            })
            .collect();
        self.notifier.enqueue_all(notices).await?;

        tracing::info!(task_id = %task.id(), round = round.value(), "task reassigned");
        Ok(ReassignmentOutcome { task, round })
    }

    /// Returns the append-only reassignment history for a task.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn history(&self, task_id: TaskId) -> OperationResult<Vec<ReassignmentRecord>> {
        Ok(self.repository.reassignment_history(task_id).await?)
    }
}
