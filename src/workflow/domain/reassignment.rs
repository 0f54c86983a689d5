//! Append-only audit record of writer reassignment rounds.

use super::{RoundNumber, TaskId, WriterPair};
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a reassignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReassignmentId(Uuid);

impl ReassignmentId {
    /// Creates a new random reassignment identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ReassignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReassignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One audit entry per task per reassignment round.
///
/// Records are append-only; nothing in the crate mutates one after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentRecord {
    id: ReassignmentId,
    task_id: TaskId,
    round: RoundNumber,
    previous_writers: WriterPair,
    new_writers: WriterPair,
    previous_deadline: Option<DateTime<Utc>>,
    new_deadline: DateTime<Utc>,
    reassigned_by: UserId,
    reason: Option<String>,
    recorded_at: DateTime<Utc>,
}

/// Parameter object for creating a reassignment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentSnapshot {
    /// Task being reassigned.
    pub task_id: TaskId,
    /// Round the reassignment opens.
    pub round: RoundNumber,
    /// Writer pair being rotated out.
    pub previous_writers: WriterPair,
    /// Writer pair being rotated in.
    pub new_writers: WriterPair,
    /// Deadline of the closed round, if any.
    pub previous_deadline: Option<DateTime<Utc>>,
    /// Deadline of the new round.
    pub new_deadline: DateTime<Utc>,
    /// Admin who ordered the reassignment.
    pub reassigned_by: UserId,
    /// Optional free-text reason.
    pub reason: Option<String>,
    /// Timestamp of the reassignment.
    pub recorded_at: DateTime<Utc>,
}

impl ReassignmentRecord {
    /// Creates a record from a reassignment snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: ReassignmentSnapshot) -> Self {
        Self {
            id: ReassignmentId::new(),
            task_id: snapshot.task_id,
            round: snapshot.round,
            previous_writers: snapshot.previous_writers,
            new_writers: snapshot.new_writers,
            previous_deadline: snapshot.previous_deadline,
            new_deadline: snapshot.new_deadline,
            reassigned_by: snapshot.reassigned_by,
            reason: snapshot.reason,
            recorded_at: snapshot.recorded_at,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(id: ReassignmentId, snapshot: ReassignmentSnapshot) -> Self {
        Self {
            id,
            task_id: snapshot.task_id,
            round: snapshot.round,
            previous_writers: snapshot.previous_writers,
            new_writers: snapshot.new_writers,
            previous_deadline: snapshot.previous_deadline,
            new_deadline: snapshot.new_deadline,
            reassigned_by: snapshot.reassigned_by,
            reason: snapshot.reason,
            recorded_at: snapshot.recorded_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> ReassignmentId {
        self.id
    }

    /// Returns the reassigned task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the round this reassignment opened.
    #[must_use]
    pub const fn round(&self) -> RoundNumber {
        self.round
    }

    /// Returns the writer pair rotated out.
    #[must_use]
    pub const fn previous_writers(&self) -> &WriterPair {
        &self.previous_writers
    }

    /// Returns the writer pair rotated in.
    #[must_use]
    pub const fn new_writers(&self) -> &WriterPair {
        &self.new_writers
    }

    /// Returns the closed round's deadline, if any.
    #[must_use]
    pub const fn previous_deadline(&self) -> Option<DateTime<Utc>> {
        self.previous_deadline
    }

    /// Returns the new round's deadline.
    #[must_use]
    pub const fn new_deadline(&self) -> DateTime<Utc> {
        self.new_deadline
    }

    /// Returns the admin who ordered the reassignment.
    #[must_use]
    pub const fn reassigned_by(&self) -> UserId {
        self.reassigned_by
    }

    /// Returns the free-text reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns when the reassignment was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
