//! Draft document status.

use super::ParseDraftStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a single writer's draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    /// Editable, unsubmitted content.
    Draft,
    /// Locked in for voting.
    Submitted,
    /// Won its voting round; canonical documentation.
    Selected,
    /// Lost its voting round, or was discarded by reassignment.
    Rejected,
}

impl DraftStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Selected => "selected",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether a direct change to `target` is legal.
    ///
    /// Drafts submit once, then resolve to selected or rejected; both
    /// resolutions are terminal.
    #[must_use]
    pub const fn can_change_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Submitted) | (Self::Submitted, Self::Selected | Self::Rejected)
        )
    }

    /// Returns whether the draft still counts toward the one-live-draft
    /// invariant for its (task, writer) pair.
    #[must_use]
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

impl TryFrom<&str> for DraftStatus {
    type Error = ParseDraftStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "selected" => Ok(Self::Selected),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseDraftStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
