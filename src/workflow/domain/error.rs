//! Error types for workflow domain validation and parsing.

use super::{TaskId, TaskStatus};
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing or mutating workflow domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// The function reference is empty or malformed.
    #[error("invalid function reference '{0}', expected a non-empty symbol path")]
    InvalidFunctionRef(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The two writer slots name the same user.
    #[error("writer1 and writer2 must be distinct users, both were {0}")]
    IdenticalWriters(UserId),

    /// A writer slot names the code annotator.
    #[error("user {0} cannot both annotate and write for the same task")]
    WriterIsAnnotator(UserId),

    /// The round number is outside the persistable range.
    #[error("invalid round number {0}, expected 1..=i32::MAX")]
    InvalidRoundNumber(u32),

    /// The deadline is not strictly in the future.
    #[error("deadline {deadline} is not after the current time {now}")]
    DeadlineNotFuture {
        /// The rejected deadline.
        deadline: DateTime<Utc>,
        /// Clock reading at validation time.
        now: DateTime<Utc>,
    },

    /// The requested status change is not in the transition table.
    #[error("task {task_id} cannot transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status that was requested.
        to: TaskStatus,
    },

    /// The acting user is not one of the task's assigned writers.
    #[error("user {actor} is not an assigned writer of task {task_id}")]
    NotAnAssignedWriter {
        /// Task being acted on.
        task_id: TaskId,
        /// The acting user.
        actor: UserId,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
