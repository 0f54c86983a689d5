//! Error types for draft domain validation and parsing.

use super::{DocumentId, DraftStatus};
use crate::directory::domain::UserId;
use thiserror::Error;

/// Errors returned while constructing or mutating draft domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftDomainError {
    /// The acting user does not own the draft.
    #[error("user {actor} does not own draft {document_id}")]
    NotDraftOwner {
        /// Draft being acted on.
        document_id: DocumentId,
        /// The acting user.
        actor: UserId,
    },

    /// The requested draft status change is not legal.
    #[error("draft {document_id} cannot move from {from} to {to}")]
    InvalidStatusChange {
        /// Draft whose change was rejected.
        document_id: DocumentId,
        /// Current draft status.
        from: DraftStatus,
        /// Requested draft status.
        to: DraftStatus,
    },

    /// Content edits are only legal while the draft is unsubmitted.
    #[error("draft {document_id} is {status} and can no longer be edited")]
    NotEditable {
        /// Draft being edited.
        document_id: DocumentId,
        /// Status blocking the edit.
        status: DraftStatus,
    },
}

/// Error returned while parsing draft statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown draft status: {0}")]
pub struct ParseDraftStatusError(pub String);

/// Error returned while parsing check verdicts from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown check verdict: {0}")]
pub struct ParseVerdictError(pub String);
