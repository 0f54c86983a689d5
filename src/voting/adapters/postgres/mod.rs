//! `PostgreSQL` adapters for vote persistence.

mod models;
mod repository;

pub use repository::{PostgresBinaryVoteRepository, PostgresSessionRepository};
