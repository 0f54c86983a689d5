//! Task status state machine.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// The variants form a closed set; persistence rejects unknown values at
/// read time via [`TryFrom`]. The legal moves between statuses live in
/// [`TaskStatus::can_transition_to`], the single authority consulted by
/// every mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task created; no writer has accepted yet.
    NotStarted,
    /// At least one writer accepted and drafting is under way.
    InProgress,
    /// Drafting closed; awaiting a voting round.
    PendingVote,
    /// A voting session is open for this task.
    Voting,
    /// No draft satisfied the voters; awaiting reassignment.
    PendingReassignment,
    /// A winning draft was selected; the task is archived.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::PendingVote => "pending_vote",
            Self::Voting => "voting",
            Self::PendingReassignment => "pending_reassignment",
            Self::Completed => "completed",
        }
    }

    /// Returns whether a direct transition to `target` is legal.
    ///
    /// Encodes the authoritative transition table:
    ///
    /// - `NotStarted → InProgress` (first writer accepts)
    /// - `InProgress → PendingVote` (both drafts submitted, or deadline passed)
    /// - `PendingVote → Voting` (session opened)
    /// - `PendingVote → Completed | PendingReassignment` (binary resolution)
    /// - `Voting → Completed | PendingReassignment` (session ended)
    /// - `Voting → PendingVote` (session cancelled)
    /// - `PendingReassignment → NotStarted` (new round assigned)
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::NotStarted, Self::InProgress)
                | (Self::InProgress, Self::PendingVote)
                | (
                    Self::PendingVote,
                    Self::Voting | Self::Completed | Self::PendingReassignment
                )
                | (
                    Self::Voting,
                    Self::Completed | Self::PendingReassignment | Self::PendingVote
                )
                | (Self::PendingReassignment, Self::NotStarted)
        )
    }

    /// Returns whether the status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "pending_vote" => Ok(Self::PendingVote),
            "voting" => Ok(Self::Voting),
            "pending_reassignment" => Ok(Self::PendingReassignment),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
