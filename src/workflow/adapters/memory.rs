//! In-memory workflow repository for service tests.

use async_trait::async_trait;

use crate::db::memory::InMemoryDb;
use crate::workflow::{
    domain::{ReassignmentRecord, Task, TaskId},
    ports::{WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult},
};

/// Workflow repository over the shared in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowRepository {
    db: InMemoryDb,
}

impl InMemoryWorkflowRepository {
    /// Creates a repository over the given store handle.
    #[must_use]
    pub const fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn store(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let mut state = self.db.write().map_err(WorkflowRepositoryError::persistence)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(WorkflowRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let mut state = self.db.write().map_err(WorkflowRepositoryError::persistence)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(WorkflowRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>> {
        let state = self.db.read().map_err(WorkflowRepositoryError::persistence)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn reassign(
        &self,
        task: &Task,
        record: &ReassignmentRecord,
    ) -> WorkflowRepositoryResult<()> {
        let mut state = self.db.write().map_err(WorkflowRepositoryError::persistence)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(WorkflowRepositoryError::NotFound(task.id()));
        }

        // Ownership-rooted purge: everything hanging off the task goes in
        // one unit under the single write lock.
        let doomed_documents: Vec<_> = state
            .drafts
            .values()
            .filter(|draft| draft.task_id() == task.id())
            .map(crate::draft::domain::DraftDocument::id)
            .collect();
        for document_id in doomed_documents {
            state.drafts.remove(&document_id);
            state.quality_history.remove(&document_id);
        }
        state.binary_votes.retain(|vote| vote.task_id() != task.id());

        let doomed_sessions: Vec<_> = state
            .sessions
            .values()
            .filter(|session| session.task_id() == task.id())
            .map(crate::voting::domain::VotingSession::id)
            .collect();
        for session_id in doomed_sessions {
            state.sessions.remove(&session_id);
            state.candidates.remove(&session_id);
            state
                .session_votes
                .retain(|vote| vote.session_id() != session_id);
        }

        state.reassignments.push(record.clone());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn reassignment_history(
        &self,
        task_id: TaskId,
    ) -> WorkflowRepositoryResult<Vec<ReassignmentRecord>> {
        let state = self.db.read().map_err(WorkflowRepositoryError::persistence)?;
        Ok(state
            .reassignments
            .iter()
            .filter(|record| record.task_id() == task_id)
            .cloned()
            .collect())
    }
}
