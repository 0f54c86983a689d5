//! Error types for voting domain validation and parsing.

use super::{CandidateId, SessionId, SessionStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating voting domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VotingDomainError {
    /// The session no longer accepts votes or closure.
    #[error("session {session_id} is {status}, expected active")]
    SessionNotActive {
        /// Session being acted on.
        session_id: SessionId,
        /// Status blocking the action.
        status: SessionStatus,
    },

    /// The chosen candidate does not belong to the session.
    #[error("candidate {candidate_id} is not part of session {session_id}")]
    UnknownCandidate {
        /// Session being voted in.
        session_id: SessionId,
        /// The unknown candidate.
        candidate_id: CandidateId,
    },
}

/// The vote count's strict maximum is shared by more than one option.
///
/// Deliberately unresolvable here: admins gather more votes and re-run, or
/// cancel the session and open a fresh one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("vote tied at {votes} votes across {contenders} options")]
pub struct ResolutionTie {
    /// The tied leading vote count.
    pub votes: u32,
    /// Number of options sharing the lead.
    pub contenders: usize,
}

/// Error returned while parsing session statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown session status: {0}")]
pub struct ParseSessionStatusError(pub String);

/// Error returned while parsing binary vote choices from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown binary vote choice: {0}")]
pub struct ParseBinaryChoiceError(pub String);
