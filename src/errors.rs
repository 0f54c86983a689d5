//! Operation-boundary error taxonomy.
//!
//! Every service operation surfaces one of these variants, with enough
//! structure for a caller to render specific feedback: quality failures
//! carry the full check list, ties carry the tally, state violations name
//! the blocking status. Domain and port errors convert here at the service
//! boundary; nothing is swallowed.

use crate::directory::domain::UserId;
use crate::directory::ports::DirectoryError;
use crate::draft::domain::{DraftDomainError, QualityReport};
use crate::draft::ports::DraftRepositoryError;
use crate::notify::ports::NotifyError;
use crate::voting::domain::{ResolutionTie, VotingDomainError};
use crate::voting::ports::{BinaryVoteRepositoryError, SessionRepositoryError};
use crate::workflow::domain::WorkflowDomainError;
use crate::workflow::ports::WorkflowRepositoryError;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for service operations.
pub type OperationResult<T> = Result<T, OperationError>;

/// One labelled bucket count, reported with tie failures and resolutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyCount {
    /// Storage label of the bucket (choice name or candidate id).
    pub label: String,
    /// Votes counted for the bucket.
    pub votes: u32,
}

/// Errors surfaced at the operation boundary.
#[derive(Debug, Clone, Error)]
pub enum OperationError {
    /// The addressed entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"task"`.
        entity: &'static str,
        /// The missing identifier.
        id: Uuid,
    },

    /// The actor lacks the capability or ownership for the operation.
    #[error("user {actor} may not {action}")]
    Forbidden {
        /// The refused operation.
        action: &'static str,
        /// The acting user.
        actor: UserId,
    },

    /// The operation is illegal for the entity's current status.
    #[error("cannot {action} while status is {state}")]
    InvalidState {
        /// The refused operation.
        action: &'static str,
        /// The blocking status, rendered in storage form.
        state: String,
    },

    /// The actor already performed this once-only action.
    #[error("user {actor} already cast a {action}")]
    DuplicateAction {
        /// The duplicated action.
        action: &'static str,
        /// The acting user.
        actor: UserId,
    },

    /// The draft did not clear the quality gate.
    #[error("quality gate failed with aggregate score {}", report.aggregate_score())]
    QualityGateFailed {
        /// Full check list from the failing run.
        report: QualityReport,
    },

    /// Vote resolution found no strict maximum.
    #[error("voting unresolved: {tie}")]
    TieUnresolved {
        /// The tie that blocked resolution.
        tie: ResolutionTie,
        /// Labelled counts at resolution time.
        tally: Vec<TallyCount>,
    },

    /// Malformed or inconsistent input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Persistence or delivery infrastructure failed.
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl OperationError {
    /// Builds an [`OperationError::InvalidState`] from any displayable
    /// status.
    pub fn invalid_state(action: &'static str, state: impl ToString) -> Self {
        Self::InvalidState {
            action,
            state: state.to_string(),
        }
    }

    /// Wraps an infrastructure error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}

impl From<WorkflowDomainError> for OperationError {
    fn from(err: WorkflowDomainError) -> Self {
        match err {
            WorkflowDomainError::InvalidStatusTransition { from, .. } => {
                Self::invalid_state("advance the task", from)
            }
            WorkflowDomainError::NotAnAssignedWriter { actor, .. } => Self::Forbidden {
                action: "act on this task",
                actor,
            },
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<DraftDomainError> for OperationError {
    fn from(err: DraftDomainError) -> Self {
        match err {
            DraftDomainError::NotDraftOwner { actor, .. } => Self::Forbidden {
                action: "modify this draft",
                actor,
            },
            DraftDomainError::NotEditable { status, .. } => {
                Self::invalid_state("edit the draft", status)
            }
            DraftDomainError::InvalidStatusChange { from, .. } => {
                Self::invalid_state("advance the draft", from)
            }
        }
    }
}

impl From<VotingDomainError> for OperationError {
    fn from(err: VotingDomainError) -> Self {
        match err {
            VotingDomainError::SessionNotActive { status, .. } => {
                Self::invalid_state("act on the session", status)
            }
            other @ VotingDomainError::UnknownCandidate { .. } => {
                Self::Validation(other.to_string())
            }
        }
    }
}

impl From<WorkflowRepositoryError> for OperationError {
    fn from(err: WorkflowRepositoryError) -> Self {
        match err {
            WorkflowRepositoryError::NotFound(id) => Self::NotFound {
                entity: "task",
                id: id.into_inner(),
            },
            other @ WorkflowRepositoryError::DuplicateTask(_) => {
                Self::Validation(other.to_string())
            }
            WorkflowRepositoryError::Persistence(source) => Self::Storage(source),
        }
    }
}

impl From<DraftRepositoryError> for OperationError {
    fn from(err: DraftRepositoryError) -> Self {
        match err {
            DraftRepositoryError::NotFound(id) => Self::NotFound {
                entity: "draft",
                id: id.into_inner(),
            },
            DraftRepositoryError::TaskNotFound(id) => Self::NotFound {
                entity: "task",
                id: id.into_inner(),
            },
            other @ DraftRepositoryError::DuplicateLiveDraft { .. } => {
                Self::Validation(other.to_string())
            }
            DraftRepositoryError::Persistence(source) => Self::Storage(source),
        }
    }
}

impl From<BinaryVoteRepositoryError> for OperationError {
    fn from(err: BinaryVoteRepositoryError) -> Self {
        match err {
            BinaryVoteRepositoryError::DuplicateVote { voter, .. } => Self::DuplicateAction {
                action: "binary vote",
                actor: voter,
            },
            BinaryVoteRepositoryError::Persistence(source) => Self::Storage(source),
        }
    }
}

impl From<SessionRepositoryError> for OperationError {
    fn from(err: SessionRepositoryError) -> Self {
        match err {
            SessionRepositoryError::NotFound(id) => Self::NotFound {
                entity: "session",
                id: id.into_inner(),
            },
            SessionRepositoryError::DuplicateVote { voter, .. } => Self::DuplicateAction {
                action: "session vote",
                actor: voter,
            },
            other @ SessionRepositoryError::OpenSessionExists(_) => {
                Self::Validation(other.to_string())
            }
            SessionRepositoryError::Persistence(source) => Self::Storage(source),
        }
    }
}

impl From<DirectoryError> for OperationError {
    fn from(err: DirectoryError) -> Self {
        Self::storage(err)
    }
}

impl From<NotifyError> for OperationError {
    fn from(err: NotifyError) -> Self {
        Self::storage(err)
    }
}
