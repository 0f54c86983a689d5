//! Notification value objects.

use crate::directory::domain::UserId;
use serde::{Deserialize, Serialize};

/// Workflow event category carried with each notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A task was assigned to the recipient.
    TaskAssigned,
    /// Both drafts are in and voting may begin.
    VotingReady,
    /// A voting round resolved with a winner.
    VotingResolved,
    /// The recipient was assigned in a new round after reassignment.
    TaskReassigned,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::VotingReady => "voting_ready",
            Self::VotingResolved => "voting_resolved",
            Self::TaskReassigned => "task_reassigned",
        }
    }
}

/// A message enqueued to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    recipient: UserId,
    kind: NotificationKind,
    message: String,
}

impl Notification {
    /// Creates a notification for one recipient.
    #[must_use]
    pub fn new(recipient: UserId, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            recipient,
            kind,
            message: message.into(),
        }
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the event category.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the human-readable message body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
