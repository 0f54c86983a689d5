//! Diesel row models for task and reassignment persistence.

use crate::db::schema::{reassignment_records, tasks};
use crate::workflow::domain::{
    FunctionRef, PersistedTaskData, ReassignmentId, ReassignmentRecord, ReassignmentSnapshot,
    RoundNumber, Task, TaskId, TaskStatus, WriterPair,
};
use crate::workflow::ports::{WorkflowRepositoryError, WorkflowRepositoryResult};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::directory::domain::UserId;
use crate::voting::domain::SessionId;

/// Row model for task records, usable for both reads and writes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Function under documentation.
    pub function_ref: String,
    /// Human-readable title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Code annotator assignment.
    pub annotator: Uuid,
    /// First writer slot.
    pub writer1: Uuid,
    /// Second writer slot.
    pub writer2: Uuid,
    /// Admin who created the task.
    pub assigned_by: Uuid,
    /// Optional submission deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Lifecycle status in storage form.
    pub status: String,
    /// Linked voting session, if any.
    pub voting_session: Option<Uuid>,
    /// Assignment round counter.
    pub round: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskRow {
    /// Flattens a task aggregate into its row form.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id().into_inner(),
            function_ref: task.function_ref().as_str().to_owned(),
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            annotator: task.annotator().into_inner(),
            writer1: task.writers().writer1().into_inner(),
            writer2: task.writers().writer2().into_inner(),
            assigned_by: task.assigned_by().into_inner(),
            deadline: task.deadline(),
            status: task.status().as_str().to_owned(),
            voting_session: task.voting_session().map(SessionId::into_inner),
            round: task.round().value().cast_signed(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }

    /// Rebuilds the task aggregate, re-validating stored values.
    pub fn into_task(self) -> WorkflowRepositoryResult<Task> {
        let status = TaskStatus::try_from(self.status.as_str())
            .map_err(WorkflowRepositoryError::persistence)?;
        let function_ref =
            FunctionRef::new(self.function_ref).map_err(WorkflowRepositoryError::persistence)?;
        let writers = WriterPair::new(
            UserId::from_uuid(self.writer1),
            UserId::from_uuid(self.writer2),
        )
        .map_err(WorkflowRepositoryError::persistence)?;
        let round = u32::try_from(self.round)
            .map_err(WorkflowRepositoryError::persistence)
            .and_then(|value| {
                RoundNumber::new(value).map_err(WorkflowRepositoryError::persistence)
            })?;

        Ok(Task::from_persisted(PersistedTaskData {
            id: TaskId::from_uuid(self.id),
            function_ref,
            title: self.title,
            description: self.description,
            annotator: UserId::from_uuid(self.annotator),
            writers,
            assigned_by: UserId::from_uuid(self.assigned_by),
            deadline: self.deadline,
            status,
            voting_session: self.voting_session.map(SessionId::from_uuid),
            round,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Insert model for reassignment audit records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reassignment_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReassignmentRow {
    /// Record identifier.
    pub id: Uuid,
    /// Reassigned task.
    pub task_id: Uuid,
    /// Round the reassignment opened.
    pub round: i32,
    /// Outgoing first writer.
    pub previous_writer1: Uuid,
    /// Outgoing second writer.
    pub previous_writer2: Uuid,
    /// Incoming first writer.
    pub new_writer1: Uuid,
    /// Incoming second writer.
    pub new_writer2: Uuid,
    /// Deadline of the closed round, if any.
    pub previous_deadline: Option<DateTime<Utc>>,
    /// Deadline of the new round.
    pub new_deadline: DateTime<Utc>,
    /// Admin who ordered the reassignment.
    pub reassigned_by: Uuid,
    /// Optional free-text reason.
    pub reason: Option<String>,
    /// When the reassignment was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl ReassignmentRow {
    /// Flattens an audit record into its row form.
    #[must_use]
    pub fn from_record(record: &ReassignmentRecord) -> Self {
        Self {
            id: record.id().into_inner(),
            task_id: record.task_id().into_inner(),
            round: record.round().value().cast_signed(),
            previous_writer1: record.previous_writers().writer1().into_inner(),
            previous_writer2: record.previous_writers().writer2().into_inner(),
            new_writer1: record.new_writers().writer1().into_inner(),
            new_writer2: record.new_writers().writer2().into_inner(),
            previous_deadline: record.previous_deadline(),
            new_deadline: record.new_deadline(),
            reassigned_by: record.reassigned_by().into_inner(),
            reason: record.reason().map(str::to_owned),
            recorded_at: record.recorded_at(),
        }
    }

    /// Rebuilds the audit record, re-validating stored values.
    pub fn into_record(self) -> WorkflowRepositoryResult<ReassignmentRecord> {
        let round = u32::try_from(self.round)
            .map_err(WorkflowRepositoryError::persistence)
            .and_then(|value| {
                RoundNumber::new(value).map_err(WorkflowRepositoryError::persistence)
            })?;
        let previous_writers = WriterPair::new(
            UserId::from_uuid(self.previous_writer1),
            UserId::from_uuid(self.previous_writer2),
        )
        .map_err(WorkflowRepositoryError::persistence)?;
        let new_writers = WriterPair::new(
            UserId::from_uuid(self.new_writer1),
            UserId::from_uuid(self.new_writer2),
        )
        .map_err(WorkflowRepositoryError::persistence)?;

        Ok(ReassignmentRecord::from_persisted(
            ReassignmentId::from_uuid(self.id),
            ReassignmentSnapshot {
                task_id: TaskId::from_uuid(self.task_id),
                round,
                previous_writers,
                new_writers,
                previous_deadline: self.previous_deadline,
                new_deadline: self.new_deadline,
                reassigned_by: UserId::from_uuid(self.reassigned_by),
                reason: self.reason,
                recorded_at: self.recorded_at,
            },
        ))
    }
}
