//! Port contracts for vote persistence.

pub mod binary;
pub mod session;

pub use binary::{BinaryVoteRepository, BinaryVoteRepositoryError, BinaryVoteRepositoryResult};
pub use session::{SessionRepository, SessionRepositoryError, SessionRepositoryResult};
