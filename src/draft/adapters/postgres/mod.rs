//! `PostgreSQL` adapters for draft persistence.

pub(crate) mod models;
mod repository;

pub use repository::PostgresDraftRepository;
