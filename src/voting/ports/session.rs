//! Repository port for voting sessions, candidates, and session votes.

use crate::directory::domain::UserId;
use crate::draft::domain::DraftDocument;
use crate::voting::domain::{Candidate, SessionId, SessionVote, VotingSession};
use crate::workflow::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for session repository operations.
pub type SessionRepositoryResult<T> = Result<T, SessionRepositoryError>;

/// Session persistence contract.
///
/// Every mutating method is one atomic unit against the shared store.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Opens a session as one atomic unit: the session row, one candidate
    /// per submitted draft, and the task flipped to `voting`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionRepositoryError::OpenSessionExists`] when the task
    /// already has an active session.
    async fn open(
        &self,
        session: &VotingSession,
        candidates: &[Candidate],
        task: &Task,
    ) -> SessionRepositoryResult<()>;

    /// Finds a session by identifier.
    ///
    /// Returns `None` when the session does not exist.
    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<VotingSession>>;

    /// Returns a session's candidates in registration order.
    async fn candidates_for(&self, id: SessionId) -> SessionRepositoryResult<Vec<Candidate>>;

    /// Finds the task's active session, if any.
    async fn find_active_for_task(
        &self,
        task_id: TaskId,
    ) -> SessionRepositoryResult<Option<VotingSession>>;

    /// Inserts one session ballot, guarded by the (session, voter)
    /// uniqueness constraint.
    ///
    /// # Errors
    ///
    /// Returns [`SessionRepositoryError::DuplicateVote`] when the voter
    /// already voted in the session.
    async fn cast(&self, vote: &SessionVote) -> SessionRepositoryResult<()>;

    /// Returns all ballots cast in a session, in cast order.
    async fn votes_for_session(&self, id: SessionId) -> SessionRepositoryResult<Vec<SessionVote>>;

    /// Persists a session closure as one atomic unit: the completed
    /// session, its finalised candidates (counts and winner flag), the
    /// resolved task, and the selected/rejected drafts.
    ///
    /// # Errors
    ///
    /// Returns [`SessionRepositoryError::NotFound`] when the session does
    /// not exist; partial failure aborts the whole unit.
    async fn close(
        &self,
        session: &VotingSession,
        candidates: &[Candidate],
        task: &Task,
        selected: Option<&DraftDocument>,
        rejected: &[DraftDocument],
    ) -> SessionRepositoryResult<()>;

    /// Persists a session cancellation as one atomic unit: the cancelled
    /// session and the task returned to `pending_vote` with its session
    /// link cleared. Cast ballots are retained for audit.
    ///
    /// # Errors
    ///
    /// Returns [`SessionRepositoryError::NotFound`] when the session does
    /// not exist.
    async fn cancel(&self, session: &VotingSession, task: &Task) -> SessionRepositoryResult<()>;
}

/// Errors returned by session repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SessionRepositoryError {
    /// The session was not found.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// The task already has an active session.
    #[error("task {0} already has an active voting session")]
    OpenSessionExists(TaskId),

    /// The voter already cast a ballot in the session.
    #[error("user {voter} already voted in session {session_id}")]
    DuplicateVote {
        /// The voted session.
        session_id: SessionId,
        /// The duplicate voter.
        voter: UserId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SessionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
