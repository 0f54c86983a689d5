//! `PostgreSQL` adapters for task lifecycle persistence.

pub(crate) mod models;
mod repository;

pub use repository::PostgresWorkflowRepository;
