//! Repository port for binary per-task votes.

use crate::directory::domain::UserId;
use crate::draft::domain::DraftDocument;
use crate::voting::domain::BinaryVote;
use crate::workflow::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for binary vote repository operations.
pub type BinaryVoteRepositoryResult<T> = Result<T, BinaryVoteRepositoryError>;

/// Binary vote persistence contract.
///
/// Every mutating method is one atomic unit against the shared store.
#[async_trait]
pub trait BinaryVoteRepository: Send + Sync {
    /// Inserts one ballot, guarded by the (task, voter) uniqueness
    /// constraint. The constraint, not a pre-check, closes the race
    /// between two simultaneous ballots from the same voter.
    ///
    /// # Errors
    ///
    /// Returns [`BinaryVoteRepositoryError::DuplicateVote`] when the voter
    /// already voted on the task.
    async fn cast(&self, vote: &BinaryVote) -> BinaryVoteRepositoryResult<()>;

    /// Returns all ballots cast on a task, in cast order.
    async fn votes_for_task(&self, task_id: TaskId) -> BinaryVoteRepositoryResult<Vec<BinaryVote>>;

    /// Persists a binary resolution as one atomic unit: the resolved task
    /// and the selected/rejected drafts.
    ///
    /// # Errors
    ///
    /// Returns [`BinaryVoteRepositoryError::Persistence`] when any write
    /// fails; partial failure aborts the whole unit.
    async fn record_resolution(
        &self,
        task: &Task,
        selected: Option<&DraftDocument>,
        rejected: &[DraftDocument],
    ) -> BinaryVoteRepositoryResult<()>;
}

/// Errors returned by binary vote repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BinaryVoteRepositoryError {
    /// The voter already cast a ballot on the task.
    #[error("user {voter} already voted on task {task_id}")]
    DuplicateVote {
        /// The voted task.
        task_id: TaskId,
        /// The duplicate voter.
        voter: UserId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BinaryVoteRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
