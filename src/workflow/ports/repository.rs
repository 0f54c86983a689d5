//! Repository port for task persistence and round management.

use crate::workflow::domain::{ReassignmentRecord, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workflow repository operations.
pub type WorkflowRepositoryResult<T> = Result<T, WorkflowRepositoryError>;

/// Task persistence contract.
///
/// Every mutating method is one atomic unit against the shared store:
/// either all of its writes commit or none do.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> WorkflowRepositoryResult<()>;

    /// Persists changes to an existing task (status, writers, deadline,
    /// session link, round, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> WorkflowRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>>;

    /// Executes a reassignment as one atomic unit: appends the audit
    /// record, purges every artifact of the task's closed rounds (drafts
    /// with their API configs, use-case scripts, and quality-check history;
    /// binary votes; sessions with their candidates and session votes), and
    /// persists the already-reset task.
    ///
    /// The purge is ownership-rooted on the task id, so call-order between
    /// per-table deletes cannot leave orphans.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::NotFound`] when the task does not
    /// exist; any partial failure aborts the whole unit.
    async fn reassign(
        &self,
        task: &Task,
        record: &ReassignmentRecord,
    ) -> WorkflowRepositoryResult<()>;

    /// Returns a task's reassignment records, oldest first.
    async fn reassignment_history(
        &self,
        task_id: TaskId,
    ) -> WorkflowRepositoryResult<Vec<ReassignmentRecord>>;
}

/// Errors returned by workflow repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkflowRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
