//! `PostgreSQL` repository implementation for draft storage.

use super::models::{ApiConfigRow, DraftRow, QualityCheckRow, ScriptRow};
use crate::db::{
    PgPool,
    schema::{api_test_configs, draft_documents, quality_check_results, tasks, use_case_scripts},
};
use crate::directory::domain::UserId;
use crate::draft::{
    domain::{DocumentId, DraftDocument, DraftStatus, QualityReport},
    ports::{DraftRepository, DraftRepositoryError, DraftRepositoryResult},
};
use crate::workflow::adapters::postgres::models::TaskRow;
use crate::workflow::domain::{Task, TaskId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

impl From<DieselError> for DraftRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed draft repository.
#[derive(Debug, Clone)]
pub struct PostgresDraftRepository {
    pool: PgPool,
}

impl PostgresDraftRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DraftRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DraftRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DraftRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DraftRepositoryError::persistence)?
    }
}

#[async_trait]
impl DraftRepository for PostgresDraftRepository {
    async fn save(&self, draft: &DraftDocument) -> DraftRepositoryResult<()> {
        let row = DraftRow::from_draft(draft)?;
        let document_id = draft.id();
        let task_id = draft.task_id();
        let author = draft.author();
        let is_live = draft.status().is_live();
        let config_rows: Vec<ApiConfigRow> = draft
            .api_configs()
            .iter()
            .map(|config| ApiConfigRow::from_config(document_id, config))
            .collect();
        let script_rows: Vec<ScriptRow> = draft
            .use_case_scripts()
            .iter()
            .map(|script| ScriptRow::from_script(document_id, script))
            .collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, DraftRepositoryError, _>(|tx| {
                if is_live {
                    let conflicting: i64 = draft_documents::table
                        .filter(draft_documents::task_id.eq(task_id.into_inner()))
                        .filter(draft_documents::author.eq(author.into_inner()))
                        .filter(draft_documents::id.ne(document_id.into_inner()))
                        .filter(draft_documents::status.ne(DraftStatus::Rejected.as_str()))
                        .count()
                        .get_result(tx)?;
                    if conflicting > 0 {
                        return Err(DraftRepositoryError::DuplicateLiveDraft { task_id, author });
                    }
                }

                upsert_draft(tx, &row)?;
                replace_artifacts(tx, document_id, &config_rows, &script_rows)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: DocumentId) -> DraftRepositoryResult<Option<DraftDocument>> {
        self.run_blocking(move |connection| {
            let row = draft_documents::table
                .filter(draft_documents::id.eq(id.into_inner()))
                .select(DraftRow::as_select())
                .first::<DraftRow>(connection)
                .optional()?;
            row.map(|row| hydrate_draft(connection, row)).transpose()
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> DraftRepositoryResult<Vec<DraftDocument>> {
        self.run_blocking(move |connection| {
            let rows = draft_documents::table
                .filter(draft_documents::task_id.eq(task_id.into_inner()))
                .order(draft_documents::created_at.asc())
                .select(DraftRow::as_select())
                .load::<DraftRow>(connection)?;
            rows.into_iter()
                .map(|row| hydrate_draft(connection, row))
                .collect()
        })
        .await
    }

    async fn find_live_draft(
        &self,
        task_id: TaskId,
        author: UserId,
    ) -> DraftRepositoryResult<Option<DraftDocument>> {
        self.run_blocking(move |connection| {
            let row = draft_documents::table
                .filter(draft_documents::task_id.eq(task_id.into_inner()))
                .filter(draft_documents::author.eq(author.into_inner()))
                .filter(draft_documents::status.ne(DraftStatus::Rejected.as_str()))
                .select(DraftRow::as_select())
                .first::<DraftRow>(connection)
                .optional()?;
            row.map(|row| hydrate_draft(connection, row)).transpose()
        })
        .await
    }

    async fn submit(
        &self,
        draft: &DraftDocument,
        task: &Task,
        report: &QualityReport,
    ) -> DraftRepositoryResult<()> {
        let document_id = draft.id();
        let task_id = task.id();
        let draft_row = DraftRow::from_draft(draft)?;
        let task_row = TaskRow::from_task(task);
        let quality_rows = QualityCheckRow::from_report(document_id, report);

        self.run_blocking(move |connection| {
            connection.transaction::<_, DraftRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    draft_documents::table
                        .filter(draft_documents::id.eq(document_id.into_inner())),
                )
                .set(&draft_row)
                .execute(tx)?;
                if updated == 0 {
                    return Err(DraftRepositoryError::NotFound(document_id));
                }

                replace_quality_rows(tx, document_id, &quality_rows)?;

                let task_updated =
                    diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                        .set(&task_row)
                        .execute(tx)?;
                if task_updated == 0 {
                    return Err(DraftRepositoryError::TaskNotFound(task_id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn replace_quality_history(
        &self,
        id: DocumentId,
        report: &QualityReport,
    ) -> DraftRepositoryResult<()> {
        let quality_rows = QualityCheckRow::from_report(id, report);
        self.run_blocking(move |connection| {
            connection.transaction::<_, DraftRepositoryError, _>(|tx| {
                let exists: i64 = draft_documents::table
                    .filter(draft_documents::id.eq(id.into_inner()))
                    .count()
                    .get_result(tx)?;
                if exists == 0 {
                    return Err(DraftRepositoryError::NotFound(id));
                }
                replace_quality_rows(tx, id, &quality_rows)
            })
        })
        .await
    }

    async fn quality_history(
        &self,
        id: DocumentId,
    ) -> DraftRepositoryResult<Option<QualityReport>> {
        self.run_blocking(move |connection| {
            let rows = quality_check_results::table
                .filter(quality_check_results::document_id.eq(id.into_inner()))
                .order(quality_check_results::position.asc())
                .select(QualityCheckRow::as_select())
                .load::<QualityCheckRow>(connection)?;
            QualityCheckRow::into_report(rows)
        })
        .await
    }
}

/// Inserts the draft row or refreshes it in place on id conflict.
fn upsert_draft(connection: &mut PgConnection, row: &DraftRow) -> DraftRepositoryResult<()> {
    diesel::insert_into(draft_documents::table)
        .values(row)
        .on_conflict(draft_documents::id)
        .do_update()
        .set(row)
        .execute(connection)?;
    Ok(())
}

/// Replaces a document's artifact rows with the given collections.
fn replace_artifacts(
    connection: &mut PgConnection,
    document_id: DocumentId,
    configs: &[ApiConfigRow],
    scripts: &[ScriptRow],
) -> DraftRepositoryResult<()> {
    diesel::delete(
        api_test_configs::table.filter(api_test_configs::document_id.eq(document_id.into_inner())),
    )
    .execute(connection)?;
    diesel::insert_into(api_test_configs::table)
        .values(configs)
        .execute(connection)?;

    diesel::delete(
        use_case_scripts::table.filter(use_case_scripts::document_id.eq(document_id.into_inner())),
    )
    .execute(connection)?;
    diesel::insert_into(use_case_scripts::table)
        .values(scripts)
        .execute(connection)?;
    Ok(())
}

/// Replaces a document's quality-check rows with the given run.
fn replace_quality_rows(
    connection: &mut PgConnection,
    document_id: DocumentId,
    rows: &[QualityCheckRow],
) -> DraftRepositoryResult<()> {
    diesel::delete(
        quality_check_results::table
            .filter(quality_check_results::document_id.eq(document_id.into_inner())),
    )
    .execute(connection)?;
    diesel::insert_into(quality_check_results::table)
        .values(rows)
        .execute(connection)?;
    Ok(())
}

/// Loads a draft row's artifacts and rebuilds the aggregate.
fn hydrate_draft(
    connection: &mut PgConnection,
    row: DraftRow,
) -> DraftRepositoryResult<DraftDocument> {
    let config_rows = api_test_configs::table
        .filter(api_test_configs::document_id.eq(row.id))
        .order(api_test_configs::position.asc())
        .select(ApiConfigRow::as_select())
        .load::<ApiConfigRow>(connection)?;
    let script_rows = use_case_scripts::table
        .filter(use_case_scripts::document_id.eq(row.id))
        .order(use_case_scripts::position.asc())
        .select(ScriptRow::as_select())
        .load::<ScriptRow>(connection)?;

    let api_configs = config_rows
        .into_iter()
        .map(ApiConfigRow::into_config)
        .collect::<DraftRepositoryResult<Vec<_>>>()?;
    let use_case_scripts = script_rows
        .into_iter()
        .map(ScriptRow::into_script)
        .collect::<DraftRepositoryResult<Vec<_>>>()?;
    row.into_draft(api_configs, use_case_scripts)
}
