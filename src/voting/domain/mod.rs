//! Domain model for binary and session voting.

mod ballot;
mod error;
mod ids;
mod resolution;
mod session;

pub use ballot::{BinaryChoice, BinaryVote};
pub use error::{
    ParseBinaryChoiceError, ParseSessionStatusError, ResolutionTie, VotingDomainError,
};
pub use ids::{CandidateId, SessionId, VoteId};
pub use resolution::{Bucket, Tally, TallyEntry};
pub use session::{Candidate, SessionChoice, SessionStatus, SessionVote, VotingSession};
