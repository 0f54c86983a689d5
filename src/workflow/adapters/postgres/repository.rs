//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::models::{ReassignmentRow, TaskRow};
use crate::db::{
    PgPool,
    schema::{
        api_test_configs, binary_votes, draft_documents, quality_check_results,
        reassignment_records, session_candidates, session_votes, tasks, use_case_scripts,
        voting_sessions,
    },
};
use crate::workflow::{
    domain::{ReassignmentRecord, Task, TaskId},
    ports::{WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl From<DieselError> for WorkflowRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed workflow repository.
#[derive(Debug, Clone)]
pub struct PostgresWorkflowRepository {
    pool: PgPool,
}

impl PostgresWorkflowRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkflowRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkflowRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(WorkflowRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkflowRepositoryError::persistence)?
    }
}

#[async_trait]
impl WorkflowRepository for PostgresWorkflowRepository {
    async fn store(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let task_id = task.id();
        let row = TaskRow::from_task(task);
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        WorkflowRepositoryError::DuplicateTask(task_id)
                    }
                    _ => WorkflowRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let task_id = task.id();
        let row = TaskRow::from_task(task);
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(WorkflowRepositoryError::persistence)?;
            if updated == 0 {
                return Err(WorkflowRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(WorkflowRepositoryError::persistence)?;
            row.map(TaskRow::into_task).transpose()
        })
        .await
    }

    async fn reassign(
        &self,
        task: &Task,
        record: &ReassignmentRecord,
    ) -> WorkflowRepositoryResult<()> {
        let task_id = task.id();
        let task_row = TaskRow::from_task(task);
        let record_row = ReassignmentRow::from_record(record);
        self.run_blocking(move |connection| {
            connection.transaction::<_, WorkflowRepositoryError, _>(|tx| {
                let raw_task_id = task_id.into_inner();

                let doomed_documents = draft_documents::table
                    .filter(draft_documents::task_id.eq(raw_task_id))
                    .select(draft_documents::id);
                diesel::delete(
                    quality_check_results::table
                        .filter(quality_check_results::document_id.eq_any(doomed_documents)),
                )
                .execute(tx)
                .map_err(WorkflowRepositoryError::persistence)?;
                diesel::delete(
                    api_test_configs::table
                        .filter(api_test_configs::document_id.eq_any(doomed_documents)),
                )
                .execute(tx)
                .map_err(WorkflowRepositoryError::persistence)?;
                diesel::delete(
                    use_case_scripts::table
                        .filter(use_case_scripts::document_id.eq_any(doomed_documents)),
                )
                .execute(tx)
                .map_err(WorkflowRepositoryError::persistence)?;
                diesel::delete(
                    draft_documents::table.filter(draft_documents::task_id.eq(raw_task_id)),
                )
                .execute(tx)
                .map_err(WorkflowRepositoryError::persistence)?;

                diesel::delete(binary_votes::table.filter(binary_votes::task_id.eq(raw_task_id)))
                    .execute(tx)
                    .map_err(WorkflowRepositoryError::persistence)?;

                let doomed_sessions = voting_sessions::table
                    .filter(voting_sessions::task_id.eq(raw_task_id))
                    .select(voting_sessions::id);
                diesel::delete(
                    session_votes::table.filter(session_votes::session_id.eq_any(doomed_sessions)),
                )
                .execute(tx)
                .map_err(WorkflowRepositoryError::persistence)?;
                diesel::delete(
                    session_candidates::table
                        .filter(session_candidates::session_id.eq_any(doomed_sessions)),
                )
                .execute(tx)
                .map_err(WorkflowRepositoryError::persistence)?;
                diesel::delete(
                    voting_sessions::table.filter(voting_sessions::task_id.eq(raw_task_id)),
                )
                .execute(tx)
                .map_err(WorkflowRepositoryError::persistence)?;

                diesel::insert_into(reassignment_records::table)
                    .values(&record_row)
                    .execute(tx)
                    .map_err(WorkflowRepositoryError::persistence)?;

                let updated = diesel::update(tasks::table.filter(tasks::id.eq(raw_task_id)))
                    .set(&task_row)
                    .execute(tx)
                    .map_err(WorkflowRepositoryError::persistence)?;
                if updated == 0 {
                    return Err(WorkflowRepositoryError::NotFound(task_id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn reassignment_history(
        &self,
        task_id: TaskId,
    ) -> WorkflowRepositoryResult<Vec<ReassignmentRecord>> {
        self.run_blocking(move |connection| {
            let rows = reassignment_records::table
                .filter(reassignment_records::task_id.eq(task_id.into_inner()))
                .order(reassignment_records::recorded_at.asc())
                .select(ReassignmentRow::as_select())
                .load::<ReassignmentRow>(connection)
                .map_err(WorkflowRepositoryError::persistence)?;
            rows.into_iter().map(ReassignmentRow::into_record).collect()
        })
        .await
    }
}
