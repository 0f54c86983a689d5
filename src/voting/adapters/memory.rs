//! In-memory vote repositories for service tests.

use async_trait::async_trait;

use crate::db::memory::InMemoryDb;
use crate::draft::domain::DraftDocument;
use crate::voting::{
    domain::{BinaryVote, Candidate, SessionId, SessionStatus, SessionVote, VotingSession},
    ports::{
        BinaryVoteRepository, BinaryVoteRepositoryError, BinaryVoteRepositoryResult,
        SessionRepository, SessionRepositoryError, SessionRepositoryResult,
    },
};
use crate::workflow::domain::{Task, TaskId};

/// Binary vote repository over the shared in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBinaryVoteRepository {
    db: InMemoryDb,
}

impl InMemoryBinaryVoteRepository {
    /// Creates a repository over the given store handle.
    #[must_use]
    pub const fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BinaryVoteRepository for InMemoryBinaryVoteRepository {
    async fn cast(&self, vote: &BinaryVote) -> BinaryVoteRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(BinaryVoteRepositoryError::persistence)?;
        let duplicate = state
            .binary_votes
            .iter()
            .any(|existing| existing.task_id() == vote.task_id() && existing.voter() == vote.voter());
        if duplicate {
            return Err(BinaryVoteRepositoryError::DuplicateVote {
                task_id: vote.task_id(),
                voter: vote.voter(),
            });
        }
        state.binary_votes.push(vote.clone());
        Ok(())
    }

    async fn votes_for_task(&self, task_id: TaskId) -> BinaryVoteRepositoryResult<Vec<BinaryVote>> {
        let state = self
            .db
            .read()
            .map_err(BinaryVoteRepositoryError::persistence)?;
        Ok(state
            .binary_votes
            .iter()
            .filter(|vote| vote.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn record_resolution(
        &self,
        task: &Task,
        selected: Option<&DraftDocument>,
        rejected: &[DraftDocument],
    ) -> BinaryVoteRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(BinaryVoteRepositoryError::persistence)?;
        state.tasks.insert(task.id(), task.clone());
        if let Some(winner) = selected {
            state.drafts.insert(winner.id(), winner.clone());
        }
        for draft in rejected {
            state.drafts.insert(draft.id(), draft.clone());
        }
        Ok(())
    }
}

/// Session repository over the shared in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    db: InMemoryDb,
}

impl InMemorySessionRepository {
    /// Creates a repository over the given store handle.
    #[must_use]
    pub const fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn open(
        &self,
        session: &VotingSession,
        candidates: &[Candidate],
        task: &Task,
    ) -> SessionRepositoryResult<()> {
        let mut state = self.db.write().map_err(SessionRepositoryError::persistence)?;
        let open_exists = state.sessions.values().any(|existing| {
            existing.task_id() == session.task_id() && existing.status() == SessionStatus::Active
        });
        if open_exists {
            return Err(SessionRepositoryError::OpenSessionExists(session.task_id()));
        }
        state.sessions.insert(session.id(), session.clone());
        state.candidates.insert(session.id(), candidates.to_vec());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<VotingSession>> {
        let state = self.db.read().map_err(SessionRepositoryError::persistence)?;
        Ok(state.sessions.get(&id).cloned())
    }

    async fn candidates_for(&self, id: SessionId) -> SessionRepositoryResult<Vec<Candidate>> {
        let state = self.db.read().map_err(SessionRepositoryError::persistence)?;
        Ok(state.candidates.get(&id).cloned().unwrap_or_default())
    }

    async fn find_active_for_task(
        &self,
        task_id: TaskId,
    ) -> SessionRepositoryResult<Option<VotingSession>> {
        let state = self.db.read().map_err(SessionRepositoryError::persistence)?;
        Ok(state
            .sessions
            .values()
            .find(|session| {
                session.task_id() == task_id && session.status() == SessionStatus::Active
            })
            .cloned())
    }

    async fn cast(&self, vote: &SessionVote) -> SessionRepositoryResult<()> {
        let mut state = self.db.write().map_err(SessionRepositoryError::persistence)?;
        if !state.sessions.contains_key(&vote.session_id()) {
            return Err(SessionRepositoryError::NotFound(vote.session_id()));
        }
        let duplicate = state.session_votes.iter().any(|existing| {
            existing.session_id() == vote.session_id() && existing.voter() == vote.voter()
        });
        if duplicate {
            return Err(SessionRepositoryError::DuplicateVote {
                session_id: vote.session_id(),
                voter: vote.voter(),
            });
        }
        state.session_votes.push(vote.clone());
        Ok(())
    }

    async fn votes_for_session(&self, id: SessionId) -> SessionRepositoryResult<Vec<SessionVote>> {
        let state = self.db.read().map_err(SessionRepositoryError::persistence)?;
        Ok(state
            .session_votes
            .iter()
            .filter(|vote| vote.session_id() == id)
            .cloned()
            .collect())
    }

    async fn close(
        &self,
        session: &VotingSession,
        candidates: &[Candidate],
        task: &Task,
        selected: Option<&DraftDocument>,
        rejected: &[DraftDocument],
    ) -> SessionRepositoryResult<()> {
        let mut state = self.db.write().map_err(SessionRepositoryError::persistence)?;
        if !state.sessions.contains_key(&session.id()) {
            return Err(SessionRepositoryError::NotFound(session.id()));
        }
        state.sessions.insert(session.id(), session.clone());
        state.candidates.insert(session.id(), candidates.to_vec());
        state.tasks.insert(task.id(), task.clone());
        if let Some(winner) = selected {
            state.drafts.insert(winner.id(), winner.clone());
        }
        for draft in rejected {
            state.drafts.insert(draft.id(), draft.clone());
        }
        Ok(())
    }

    async fn cancel(&self, session: &VotingSession, task: &Task) -> SessionRepositoryResult<()> {
        let mut state = self.db.write().map_err(SessionRepositoryError::persistence)?;
        if !state.sessions.contains_key(&session.id()) {
            return Err(SessionRepositoryError::NotFound(session.id()));
        }
        state.sessions.insert(session.id(), session.clone());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }
}
