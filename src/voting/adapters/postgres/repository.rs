//! `PostgreSQL` repository implementations for vote storage.

use super::models::{BinaryVoteRow, CandidateRow, SessionRow, SessionVoteRow};
use crate::db::{
    PgPool,
    schema::{binary_votes, draft_documents, session_candidates, session_votes, tasks,
        voting_sessions},
};
use crate::draft::adapters::postgres::models::DraftRow;
use crate::draft::domain::DraftDocument;
use crate::voting::{
    domain::{BinaryVote, Candidate, SessionId, SessionStatus, SessionVote, VotingSession},
    ports::{
        BinaryVoteRepository, BinaryVoteRepositoryError, BinaryVoteRepositoryResult,
        SessionRepository, SessionRepositoryError, SessionRepositoryResult,
    },
};
use crate::workflow::adapters::postgres::models::TaskRow;
use crate::workflow::domain::{Task, TaskId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl From<DieselError> for BinaryVoteRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for SessionRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed binary vote repository.
#[derive(Debug, Clone)]
pub struct PostgresBinaryVoteRepository {
    pool: PgPool,
}

impl PostgresBinaryVoteRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BinaryVoteRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BinaryVoteRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BinaryVoteRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BinaryVoteRepositoryError::persistence)?
    }
}

#[async_trait]
impl BinaryVoteRepository for PostgresBinaryVoteRepository {
    async fn cast(&self, vote: &BinaryVote) -> BinaryVoteRepositoryResult<()> {
        let row = BinaryVoteRow::from_vote(vote);
        let task_id = vote.task_id();
        let voter = vote.voter();
        self.run_blocking(move |connection| {
            diesel::insert_into(binary_votes::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        BinaryVoteRepositoryError::DuplicateVote { task_id, voter }
                    }
                    _ => BinaryVoteRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn votes_for_task(&self, task_id: TaskId) -> BinaryVoteRepositoryResult<Vec<BinaryVote>> {
        self.run_blocking(move |connection| {
            let rows = binary_votes::table
                .filter(binary_votes::task_id.eq(task_id.into_inner()))
                .order(binary_votes::cast_at.asc())
                .select(BinaryVoteRow::as_select())
                .load::<BinaryVoteRow>(connection)?;
            rows.into_iter().map(BinaryVoteRow::into_vote).collect()
        })
        .await
    }

    async fn record_resolution(
        &self,
        task: &Task,
        selected: Option<&DraftDocument>,
        rejected: &[DraftDocument],
    ) -> BinaryVoteRepositoryResult<()> {
        let task_id = task.id();
        let task_row = TaskRow::from_task(task);
        let selected_row = selected
            .map(DraftRow::from_draft)
            .transpose()
            .map_err(BinaryVoteRepositoryError::persistence)?;
        let rejected_rows = rejected
            .iter()
            .map(DraftRow::from_draft)
            .collect::<Result<Vec<_>, _>>()
            .map_err(BinaryVoteRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, BinaryVoteRepositoryError, _>(|tx| {
                diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set(&task_row)
                    .execute(tx)?;
                for row in selected_row.iter().chain(rejected_rows.iter()) {
                    diesel::update(
                        draft_documents::table.filter(draft_documents::id.eq(row.id)),
                    )
                    .set(row)
                    .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }
}

/// `PostgreSQL`-backed session repository.
#[derive(Debug, Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> SessionRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SessionRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SessionRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(SessionRepositoryError::persistence)?
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn open(
        &self,
        session: &VotingSession,
        candidates: &[Candidate],
        task: &Task,
    ) -> SessionRepositoryResult<()> {
        let task_id = session.task_id();
        let session_row = SessionRow::from_session(session);
        let candidate_rows: Vec<CandidateRow> = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                CandidateRow::from_candidate(candidate, i32::try_from(index).unwrap_or(i32::MAX))
            })
            .collect();
        let task_row = TaskRow::from_task(task);

        self.run_blocking(move |connection| {
            connection.transaction::<_, SessionRepositoryError, _>(|tx| {
                let active: i64 = voting_sessions::table
                    .filter(voting_sessions::task_id.eq(task_id.into_inner()))
                    .filter(voting_sessions::status.eq(SessionStatus::Active.as_str()))
                    .count()
                    .get_result(tx)?;
                if active > 0 {
                    return Err(SessionRepositoryError::OpenSessionExists(task_id));
                }

                diesel::insert_into(voting_sessions::table)
                    .values(&session_row)
                    .execute(tx)?;
                diesel::insert_into(session_candidates::table)
                    .values(&candidate_rows)
                    .execute(tx)?;
                diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set(&task_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<VotingSession>> {
        self.run_blocking(move |connection| {
            let row = voting_sessions::table
                .filter(voting_sessions::id.eq(id.into_inner()))
                .select(SessionRow::as_select())
                .first::<SessionRow>(connection)
                .optional()?;
            row.map(SessionRow::into_session).transpose()
        })
        .await
    }

    async fn candidates_for(&self, id: SessionId) -> SessionRepositoryResult<Vec<Candidate>> {
        self.run_blocking(move |connection| {
            let rows = session_candidates::table
                .filter(session_candidates::session_id.eq(id.into_inner()))
                .order(session_candidates::position.asc())
                .select(CandidateRow::as_select())
                .load::<CandidateRow>(connection)?;
            rows.into_iter().map(CandidateRow::into_candidate).collect()
        })
        .await
    }

    async fn find_active_for_task(
        &self,
        task_id: TaskId,
    ) -> SessionRepositoryResult<Option<VotingSession>> {
        self.run_blocking(move |connection| {
            let row = voting_sessions::table
                .filter(voting_sessions::task_id.eq(task_id.into_inner()))
                .filter(voting_sessions::status.eq(SessionStatus::Active.as_str()))
                .select(SessionRow::as_select())
                .first::<SessionRow>(connection)
                .optional()?;
            row.map(SessionRow::into_session).transpose()
        })
        .await
    }

    async fn cast(&self, vote: &SessionVote) -> SessionRepositoryResult<()> {
        let row = SessionVoteRow::from_vote(vote);
        let session_id = vote.session_id();
        let voter = vote.voter();
        self.run_blocking(move |connection| {
            diesel::insert_into(session_votes::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        SessionRepositoryError::DuplicateVote { session_id, voter }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        SessionRepositoryError::NotFound(session_id)
                    }
                    _ => SessionRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn votes_for_session(&self, id: SessionId) -> SessionRepositoryResult<Vec<SessionVote>> {
        self.run_blocking(move |connection| {
            let rows = session_votes::table
                .filter(session_votes::session_id.eq(id.into_inner()))
                .order(session_votes::cast_at.asc())
                .select(SessionVoteRow::as_select())
                .load::<SessionVoteRow>(connection)?;
            rows.into_iter().map(SessionVoteRow::into_vote).collect()
        })
        .await
    }

    async fn close(
        &self,
        session: &VotingSession,
        candidates: &[Candidate],
        task: &Task,
        selected: Option<&DraftDocument>,
        rejected: &[DraftDocument],
    ) -> SessionRepositoryResult<()> {
        let session_id = session.id();
        let session_row = SessionRow::from_session(session);
        let candidate_rows: Vec<CandidateRow> = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                CandidateRow::from_candidate(candidate, i32::try_from(index).unwrap_or(i32::MAX))
            })
            .collect();
        let task_row = TaskRow::from_task(task);
        let selected_row = selected
            .map(DraftRow::from_draft)
            .transpose()
            .map_err(SessionRepositoryError::persistence)?;
        let rejected_rows = rejected
            .iter()
            .map(DraftRow::from_draft)
            .collect::<Result<Vec<_>, _>>()
            .map_err(SessionRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, SessionRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    voting_sessions::table
                        .filter(voting_sessions::id.eq(session_id.into_inner())),
                )
                .set(&session_row)
                .execute(tx)?;
                if updated == 0 {
                    return Err(SessionRepositoryError::NotFound(session_id));
                }

                for row in &candidate_rows {
                    diesel::update(
                        session_candidates::table.filter(session_candidates::id.eq(row.id)),
                    )
                    .set(row)
                    .execute(tx)?;
                }
                diesel::update(tasks::table.filter(tasks::id.eq(task_row.id)))
                    .set(&task_row)
                    .execute(tx)?;
                for row in selected_row.iter().chain(rejected_rows.iter()) {
                    diesel::update(
                        draft_documents::table.filter(draft_documents::id.eq(row.id)),
                    )
                    .set(row)
                    .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn cancel(&self, session: &VotingSession, task: &Task) -> SessionRepositoryResult<()> {
        let session_id = session.id();
        let session_row = SessionRow::from_session(session);
        let task_row = TaskRow::from_task(task);
        self.run_blocking(move |connection| {
            connection.transaction::<_, SessionRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    voting_sessions::table
                        .filter(voting_sessions::id.eq(session_id.into_inner())),
                )
                .set(&session_row)
                .execute(tx)?;
                if updated == 0 {
                    return Err(SessionRepositoryError::NotFound(session_id));
                }
                diesel::update(tasks::table.filter(tasks::id.eq(task_row.id)))
                    .set(&task_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }
}
