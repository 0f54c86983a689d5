//! Binary per-task votes.

use super::{Bucket, ParseBinaryChoiceError, VoteId};
use crate::directory::domain::UserId;
use crate::workflow::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three options of a binary per-task vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryChoice {
    /// First writer's submitted draft.
    VersionA,
    /// Second writer's submitted draft.
    VersionB,
    /// Neither draft satisfies the voter.
    NeitherSatisfactory,
}

impl BinaryChoice {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VersionA => "version_a",
            Self::VersionB => "version_b",
            Self::NeitherSatisfactory => "neither_satisfactory",
        }
    }
}

impl TryFrom<&str> for BinaryChoice {
    type Error = ParseBinaryChoiceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "version_a" => Ok(Self::VersionA),
            "version_b" => Ok(Self::VersionB),
            "neither_satisfactory" => Ok(Self::NeitherSatisfactory),
            _ => Err(ParseBinaryChoiceError(value.to_owned())),
        }
    }
}

impl From<BinaryChoice> for Bucket<BinaryChoice> {
    fn from(choice: BinaryChoice) -> Self {
        match choice {
            BinaryChoice::NeitherSatisfactory => Self::NoneSatisfied,
            concrete => Self::Option(concrete),
        }
    }
}

impl fmt::Display for BinaryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One voter's binary ballot on one task.
///
/// Unique per (task, voter); the repository enforces the uniqueness with a
/// storage-level constraint, not just an application pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryVote {
    id: VoteId,
    task_id: TaskId,
    voter: UserId,
    choice: BinaryChoice,
    comment: Option<String>,
    cast_at: DateTime<Utc>,
}

impl BinaryVote {
    /// Creates a ballot cast at the given time.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        voter: UserId,
        choice: BinaryChoice,
        comment: Option<String>,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: VoteId::new(),
            task_id,
            voter,
            choice,
            comment,
            cast_at,
        }
    }

    /// Reconstructs a ballot from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: VoteId,
        task_id: TaskId,
        voter: UserId,
        choice: BinaryChoice,
        comment: Option<String>,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            voter,
            choice,
            comment,
            cast_at,
        }
    }

    /// Returns the ballot identifier.
    #[must_use]
    pub const fn id(&self) -> VoteId {
        self.id
    }

    /// Returns the voted task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the voter.
    #[must_use]
    pub const fn voter(&self) -> UserId {
        self.voter
    }

    /// Returns the chosen option.
    #[must_use]
    pub const fn choice(&self) -> BinaryChoice {
        self.choice
    }

    /// Returns the optional free-text comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns when the ballot was cast.
    #[must_use]
    pub const fn cast_at(&self) -> DateTime<Utc> {
        self.cast_at
    }
}
