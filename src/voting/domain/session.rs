//! Voting sessions, candidates, and session votes.

use super::{Bucket, CandidateId, ParseSessionStatusError, SessionId, VoteId, VotingDomainError};
use crate::directory::domain::UserId;
use crate::draft::domain::DocumentId;
use crate::workflow::domain::{RoundNumber, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a voting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepting votes.
    Active,
    /// Ended with a recorded outcome; irreversible.
    Completed,
    /// Abandoned by an admin; irreversible.
    Cancelled,
}

impl SessionStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for SessionStatus {
    type Error = ParseSessionStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseSessionStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A voting round wrapping one task's submitted drafts.
///
/// Sessions transition independently of the task:
/// `Active → Completed | Cancelled`, both terminal. A cancelled session is
/// never reopened; a later round gets a fresh session entity, so votes cast
/// into a cancelled session can never reach a new tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingSession {
    id: SessionId,
    task_id: TaskId,
    round: RoundNumber,
    title: String,
    status: SessionStatus,
    opened_by: UserId,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl VotingSession {
    /// Opens a new active session.
    #[must_use]
    pub fn open(
        task_id: TaskId,
        round: RoundNumber,
        title: impl Into<String>,
        opened_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: SessionId::new(),
            task_id,
            round,
            title: title.into(),
            status: SessionStatus::Active,
            opened_by,
            opened_at: clock.utc(),
            closed_at: None,
        }
    }

    /// Reconstructs a session from persisted storage.
    #[must_use]
    #[expect(
        clippy::too_many_arguments,
        reason = "persistence constructor mirrors the stored row"
    )]
    pub const fn from_persisted(
        id: SessionId,
        task_id: TaskId,
        round: RoundNumber,
        title: String,
        status: SessionStatus,
        opened_by: UserId,
        opened_at: DateTime<Utc>,
        closed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            task_id,
            round,
            title,
            status,
            opened_by,
            opened_at,
            closed_at,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the wrapped task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the assignment round the session votes on.
    #[must_use]
    pub const fn round(&self) -> RoundNumber {
        self.round
    }

    /// Returns the session title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the session status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns the admin who opened the session.
    #[must_use]
    pub const fn opened_by(&self) -> UserId {
        self.opened_by
    }

    /// Returns when the session was opened.
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Returns when the session was closed, if it was.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Validates that the session still accepts votes and closure.
    ///
    /// # Errors
    ///
    /// Returns [`VotingDomainError::SessionNotActive`] otherwise.
    pub const fn ensure_active(&self) -> Result<(), VotingDomainError> {
        match self.status {
            SessionStatus::Active => Ok(()),
            status => Err(VotingDomainError::SessionNotActive {
                session_id: self.id,
                status,
            }),
        }
    }

    /// Ends the session with a recorded outcome.
    ///
    /// # Errors
    ///
    /// Returns [`VotingDomainError::SessionNotActive`] unless active.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), VotingDomainError> {
        self.ensure_active()?;
        self.status = SessionStatus::Completed;
        self.closed_at = Some(clock.utc());
        Ok(())
    }

    /// Cancels the session without an outcome.
    ///
    /// # Errors
    ///
    /// Returns [`VotingDomainError::SessionNotActive`] unless active.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), VotingDomainError> {
        self.ensure_active()?;
        self.status = SessionStatus::Cancelled;
        self.closed_at = Some(clock.utc());
        Ok(())
    }
}

/// One submitted draft registered for comparison within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    id: CandidateId,
    session_id: SessionId,
    document_id: DocumentId,
    author: UserId,
    vote_count: u32,
    is_winner: bool,
}

impl Candidate {
    /// Registers a submitted draft as a candidate.
    #[must_use]
    pub fn new(session_id: SessionId, document_id: DocumentId, author: UserId) -> Self {
        Self {
            id: CandidateId::new(),
            session_id,
            document_id,
            author,
            vote_count: 0,
            is_winner: false,
        }
    }

    /// Reconstructs a candidate from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: CandidateId,
        session_id: SessionId,
        document_id: DocumentId,
        author: UserId,
        vote_count: u32,
        is_winner: bool,
    ) -> Self {
        Self {
            id,
            session_id,
            document_id,
            author,
            vote_count,
            is_winner,
        }
    }

    /// Returns the candidate identifier.
    #[must_use]
    pub const fn id(&self) -> CandidateId {
        self.id
    }

    /// Returns the owning session.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the underlying draft document.
    #[must_use]
    pub const fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Returns the denormalised draft author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the recorded vote count.
    #[must_use]
    pub const fn vote_count(&self) -> u32 {
        self.vote_count
    }

    /// Returns whether session closure marked this candidate the winner.
    #[must_use]
    pub const fn is_winner(&self) -> bool {
        self.is_winner
    }

    /// Records the final count and winner flag.
    ///
    /// Only session-closing logic calls this; counts are never updated
    /// vote-by-vote.
    pub const fn finalize(&mut self, vote_count: u32, is_winner: bool) {
        self.vote_count = vote_count;
        self.is_winner = is_winner;
    }
}

/// A session voter's discriminated choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "candidate_id", rename_all = "snake_case")]
pub enum SessionChoice {
    /// A specific candidate.
    Candidate(CandidateId),
    /// No candidate satisfied the voter.
    NoneSatisfied,
}

impl From<SessionChoice> for Bucket<CandidateId> {
    fn from(choice: SessionChoice) -> Self {
        match choice {
            SessionChoice::Candidate(id) => Self::Option(id),
            SessionChoice::NoneSatisfied => Self::NoneSatisfied,
        }
    }
}

/// One voter's ballot within a session.
///
/// Unique per (session, voter); enforced by a storage-level constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionVote {
    id: VoteId,
    session_id: SessionId,
    voter: UserId,
    choice: SessionChoice,
    cast_at: DateTime<Utc>,
}

impl SessionVote {
    /// Creates a ballot cast at the given time.
    #[must_use]
    pub fn new(
        session_id: SessionId,
        voter: UserId,
        choice: SessionChoice,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: VoteId::new(),
            session_id,
            voter,
            choice,
            cast_at,
        }
    }

    /// Reconstructs a ballot from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: VoteId,
        session_id: SessionId,
        voter: UserId,
        choice: SessionChoice,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            session_id,
            voter,
            choice,
            cast_at,
        }
    }

    /// Returns the ballot identifier.
    #[must_use]
    pub const fn id(&self) -> VoteId {
        self.id
    }

    /// Returns the voted session.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the voter.
    #[must_use]
    pub const fn voter(&self) -> UserId {
        self.voter
    }

    /// Returns the discriminated choice.
    #[must_use]
    pub const fn choice(&self) -> SessionChoice {
        self.choice
    }

    /// Returns when the ballot was cast.
    #[must_use]
    pub const fn cast_at(&self) -> DateTime<Utc> {
        self.cast_at
    }
}
