//! Repository port for draft documents, artifacts, and quality history.

use crate::directory::domain::UserId;
use crate::draft::domain::{DocumentId, DraftDocument, QualityReport};
use crate::workflow::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for draft repository operations.
pub type DraftRepositoryResult<T> = Result<T, DraftRepositoryError>;

/// Draft persistence contract.
///
/// Every mutating method is one atomic unit against the shared store.
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Inserts or updates a writer's draft together with its artifact
    /// collections.
    ///
    /// # Errors
    ///
    /// Returns [`DraftRepositoryError::DuplicateLiveDraft`] when a
    /// different non-rejected draft already exists for the same
    /// (task, writer) pair.
    async fn save(&self, draft: &DraftDocument) -> DraftRepositoryResult<()>;

    /// Finds a draft by document identifier.
    ///
    /// Returns `None` when the draft does not exist.
    async fn find_by_id(&self, id: DocumentId) -> DraftRepositoryResult<Option<DraftDocument>>;

    /// Returns all drafts of a task, any round, ordered by creation time.
    async fn find_by_task(&self, task_id: TaskId) -> DraftRepositoryResult<Vec<DraftDocument>>;

    /// Finds a writer's live (non-rejected) draft for a task, if any.
    async fn find_live_draft(
        &self,
        task_id: TaskId,
        author: UserId,
    ) -> DraftRepositoryResult<Option<DraftDocument>>;

    /// Persists a submission as one atomic unit: the submitted draft, the
    /// passing quality report, and the task whose status may have advanced
    /// to `pending_vote`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftRepositoryError::NotFound`] when the draft does not
    /// exist or [`DraftRepositoryError::TaskNotFound`] for the task.
    async fn submit(
        &self,
        draft: &DraftDocument,
        task: &Task,
        report: &QualityReport,
    ) -> DraftRepositoryResult<()>;

    /// Replaces the persisted quality-check rows for a document with the
    /// given run, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`DraftRepositoryError::NotFound`] when the document does
    /// not exist.
    async fn replace_quality_history(
        &self,
        id: DocumentId,
        report: &QualityReport,
    ) -> DraftRepositoryResult<()>;

    /// Returns the most recently persisted quality run for a document.
    ///
    /// Returns `None` when the gate has never been run for the document.
    async fn quality_history(&self, id: DocumentId)
    -> DraftRepositoryResult<Option<QualityReport>>;
}

/// Errors returned by draft repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DraftRepositoryError {
    /// The draft was not found.
    #[error("draft not found: {0}")]
    NotFound(DocumentId),

    /// The referenced task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The (task, writer) pair already has a live draft.
    #[error("writer {author} already has a live draft for task {task_id}")]
    DuplicateLiveDraft {
        /// The owning task.
        task_id: TaskId,
        /// The writer with the existing draft.
        author: UserId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DraftRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
