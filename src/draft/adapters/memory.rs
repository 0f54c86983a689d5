//! In-memory draft repository for service tests.

use async_trait::async_trait;

use crate::db::memory::InMemoryDb;
use crate::directory::domain::UserId;
use crate::draft::{
    domain::{DocumentId, DraftDocument, QualityReport},
    ports::{DraftRepository, DraftRepositoryError, DraftRepositoryResult},
};
use crate::workflow::domain::{Task, TaskId};

/// Draft repository over the shared in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftRepository {
    db: InMemoryDb,
}

impl InMemoryDraftRepository {
    /// Creates a repository over the given store handle.
    #[must_use]
    pub const fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DraftRepository for InMemoryDraftRepository {
    async fn save(&self, draft: &DraftDocument) -> DraftRepositoryResult<()> {
        let mut state = self.db.write().map_err(DraftRepositoryError::persistence)?;
        let conflicting = state.drafts.values().any(|existing| {
            existing.id() != draft.id()
                && existing.task_id() == draft.task_id()
                && existing.author() == draft.author()
                && existing.status().is_live()
        });
        if conflicting && draft.status().is_live() {
            return Err(DraftRepositoryError::DuplicateLiveDraft {
                task_id: draft.task_id(),
                author: draft.author(),
            });
        }
        state.drafts.insert(draft.id(), draft.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: DocumentId) -> DraftRepositoryResult<Option<DraftDocument>> {
        let state = self.db.read().map_err(DraftRepositoryError::persistence)?;
        Ok(state.drafts.get(&id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> DraftRepositoryResult<Vec<DraftDocument>> {
        let state = self.db.read().map_err(DraftRepositoryError::persistence)?;
        let mut drafts: Vec<_> = state
            .drafts
            .values()
            .filter(|draft| draft.task_id() == task_id)
            .cloned()
            .collect();
        drafts.sort_by_key(|draft| (draft.created_at(), draft.id().into_inner()));
        Ok(drafts)
    }

    async fn find_live_draft(
        &self,
        task_id: TaskId,
        author: UserId,
    ) -> DraftRepositoryResult<Option<DraftDocument>> {
        let state = self.db.read().map_err(DraftRepositoryError::persistence)?;
        Ok(state
            .drafts
            .values()
            .find(|draft| {
                draft.task_id() == task_id
                    && draft.author() == author
                    && draft.status().is_live()
            })
            .cloned())
    }

    async fn submit(
        &self,
        draft: &DraftDocument,
        task: &Task,
        report: &QualityReport,
    ) -> DraftRepositoryResult<()> {
        let mut state = self.db.write().map_err(DraftRepositoryError::persistence)?;
        if !state.drafts.contains_key(&draft.id()) {
            return Err(DraftRepositoryError::NotFound(draft.id()));
        }
        if !state.tasks.contains_key(&task.id()) {
            return Err(DraftRepositoryError::TaskNotFound(task.id()));
        }
        state.drafts.insert(draft.id(), draft.clone());
        state.tasks.insert(task.id(), task.clone());
        state.quality_history.insert(draft.id(), report.clone());
        Ok(())
    }

    async fn replace_quality_history(
        &self,
        id: DocumentId,
        report: &QualityReport,
    ) -> DraftRepositoryResult<()> {
        let mut state = self.db.write().map_err(DraftRepositoryError::persistence)?;
        if !state.drafts.contains_key(&id) {
            return Err(DraftRepositoryError::NotFound(id));
        }
        state.quality_history.insert(id, report.clone());
        Ok(())
    }

    async fn quality_history(
        &self,
        id: DocumentId,
    ) -> DraftRepositoryResult<Option<QualityReport>> {
        let state = self.db.read().map_err(DraftRepositoryError::persistence)?;
        Ok(state.quality_history.get(&id).cloned())
    }
}
