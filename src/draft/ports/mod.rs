//! Port contracts for draft persistence and quality history.

pub mod repository;

pub use repository::{DraftRepository, DraftRepositoryError, DraftRepositoryResult};
