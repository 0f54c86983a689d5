//! Diesel row models for vote persistence.

use crate::db::schema::{binary_votes, session_candidates, session_votes, voting_sessions};
use crate::directory::domain::UserId;
use crate::draft::domain::DocumentId;
use crate::voting::{
    domain::{
        BinaryChoice, BinaryVote, Candidate, CandidateId, SessionChoice, SessionId, SessionStatus,
        SessionVote, VoteId, VotingSession,
    },
    ports::{
        BinaryVoteRepositoryError, BinaryVoteRepositoryResult, SessionRepositoryError,
        SessionRepositoryResult,
    },
};
use crate::workflow::domain::{RoundNumber, TaskId};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Storage discriminant for candidate ballots.
const CHOICE_CANDIDATE: &str = "candidate";
/// Storage discriminant for "none satisfied" ballots.
const CHOICE_NONE_SATISFIED: &str = "none_satisfied";

/// Row model for binary ballots.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = binary_votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BinaryVoteRow {
    /// Ballot identifier.
    pub id: Uuid,
    /// Voted task.
    pub task_id: Uuid,
    /// Voter.
    pub voter: Uuid,
    /// Chosen option in storage form.
    pub choice: String,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// When the ballot was cast.
    pub cast_at: DateTime<Utc>,
}

impl BinaryVoteRow {
    /// Flattens a ballot into its row form.
    #[must_use]
    pub fn from_vote(vote: &BinaryVote) -> Self {
        Self {
            id: vote.id().into_inner(),
            task_id: vote.task_id().into_inner(),
            voter: vote.voter().into_inner(),
            choice: vote.choice().as_str().to_owned(),
            comment: vote.comment().map(str::to_owned),
            cast_at: vote.cast_at(),
        }
    }

    /// Rebuilds the ballot, re-validating the stored choice.
    pub fn into_vote(self) -> BinaryVoteRepositoryResult<BinaryVote> {
        let choice = BinaryChoice::try_from(self.choice.as_str())
            .map_err(BinaryVoteRepositoryError::persistence)?;
        Ok(BinaryVote::from_persisted(
            VoteId::from_uuid(self.id),
            TaskId::from_uuid(self.task_id),
            UserId::from_uuid(self.voter),
            choice,
            self.comment,
            self.cast_at,
        ))
    }
}

/// Row model for voting sessions.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = voting_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionRow {
    /// Session identifier.
    pub id: Uuid,
    /// Wrapped task.
    pub task_id: Uuid,
    /// Assignment round voted on.
    pub round: i32,
    /// Session title.
    pub title: String,
    /// Session status in storage form.
    pub status: String,
    /// Admin who opened the session.
    pub opened_by: Uuid,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
    /// When the session was closed, if it was.
    pub closed_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    /// Flattens a session into its row form.
    #[must_use]
    pub fn from_session(session: &VotingSession) -> Self {
        Self {
            id: session.id().into_inner(),
            task_id: session.task_id().into_inner(),
            round: session.round().value().cast_signed(),
            title: session.title().to_owned(),
            status: session.status().as_str().to_owned(),
            opened_by: session.opened_by().into_inner(),
            opened_at: session.opened_at(),
            closed_at: session.closed_at(),
        }
    }

    /// Rebuilds the session, re-validating stored values.
    pub fn into_session(self) -> SessionRepositoryResult<VotingSession> {
        let status = SessionStatus::try_from(self.status.as_str())
            .map_err(SessionRepositoryError::persistence)?;
        let round = u32::try_from(self.round)
            .map_err(SessionRepositoryError::persistence)
            .and_then(|value| {
                RoundNumber::new(value).map_err(SessionRepositoryError::persistence)
            })?;
        Ok(VotingSession::from_persisted(
            SessionId::from_uuid(self.id),
            TaskId::from_uuid(self.task_id),
            round,
            self.title,
            status,
            UserId::from_uuid(self.opened_by),
            self.opened_at,
            self.closed_at,
        ))
    }
}

/// Row model for session candidates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = session_candidates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CandidateRow {
    /// Candidate identifier.
    pub id: Uuid,
    /// Owning session.
    pub session_id: Uuid,
    /// Underlying draft document.
    pub document_id: Uuid,
    /// Denormalised draft author.
    pub author: Uuid,
    /// Registration order.
    pub position: i32,
    /// Final vote count, written at closure.
    pub vote_count: i32,
    /// Winner flag, written at closure.
    pub is_winner: bool,
}

impl CandidateRow {
    /// Flattens a candidate into its row form at the given position.
    #[must_use]
    pub fn from_candidate(candidate: &Candidate, position: i32) -> Self {
        Self {
            id: candidate.id().into_inner(),
            session_id: candidate.session_id().into_inner(),
            document_id: candidate.document_id().into_inner(),
            author: candidate.author().into_inner(),
            position,
            vote_count: i32::try_from(candidate.vote_count()).unwrap_or(i32::MAX),
            is_winner: candidate.is_winner(),
        }
    }

    /// Rebuilds the candidate value object.
    pub fn into_candidate(self) -> SessionRepositoryResult<Candidate> {
        let vote_count =
            u32::try_from(self.vote_count).map_err(SessionRepositoryError::persistence)?;
        Ok(Candidate::from_persisted(
            CandidateId::from_uuid(self.id),
            SessionId::from_uuid(self.session_id),
            DocumentId::from_uuid(self.document_id),
            UserId::from_uuid(self.author),
            vote_count,
            self.is_winner,
        ))
    }
}

/// Row model for session ballots.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = session_votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionVoteRow {
    /// Ballot identifier.
    pub id: Uuid,
    /// Voted session.
    pub session_id: Uuid,
    /// Voter.
    pub voter: Uuid,
    /// Choice discriminant.
    pub choice: String,
    /// Chosen candidate when the discriminant says so.
    pub candidate_id: Option<Uuid>,
    /// When the ballot was cast.
    pub cast_at: DateTime<Utc>,
}

impl SessionVoteRow {
    /// Flattens a ballot into its row form.
    #[must_use]
    pub fn from_vote(vote: &SessionVote) -> Self {
        let (choice, candidate_id) = match vote.choice() {
            SessionChoice::Candidate(id) => (CHOICE_CANDIDATE, Some(id.into_inner())),
            SessionChoice::NoneSatisfied => (CHOICE_NONE_SATISFIED, None),
        };
        Self {
            id: vote.id().into_inner(),
            session_id: vote.session_id().into_inner(),
            voter: vote.voter().into_inner(),
            choice: choice.to_owned(),
            candidate_id,
            cast_at: vote.cast_at(),
        }
    }

    /// Rebuilds the ballot, re-validating the stored discriminant.
    pub fn into_vote(self) -> SessionRepositoryResult<SessionVote> {
        let choice = match (self.choice.as_str(), self.candidate_id) {
            (CHOICE_CANDIDATE, Some(candidate_id)) => {
                SessionChoice::Candidate(CandidateId::from_uuid(candidate_id))
            }
            (CHOICE_NONE_SATISFIED, None) => SessionChoice::NoneSatisfied,
            _ => {
                return Err(SessionRepositoryError::persistence(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("inconsistent session ballot row {}", self.id),
                )));
            }
        };
        Ok(SessionVote::from_persisted(
            VoteId::from_uuid(self.id),
            SessionId::from_uuid(self.session_id),
            UserId::from_uuid(self.voter),
            choice,
            self.cast_at,
        ))
    }
}
