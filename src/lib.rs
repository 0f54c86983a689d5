//! Scriptorium: competitive documentation production workflow.
//!
//! Each documentation task binds one function to a code annotator and two
//! writers who produce competing drafts in isolation. A deterministic
//! quality gate blocks weak submissions, reviewers vote between the
//! surviving versions, and an atomic reassignment procedure starts a fresh
//! round when no version satisfies.
//!
//! # Architecture
//!
//! Scriptorium follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`,
//!   in-memory)
//!
//! # Modules
//!
//! - [`workflow`]: Task state machine, acceptance, and reassignment
//! - [`draft`]: Draft documents, the quality gate, and content isolation
//! - [`voting`]: Binary and session voting over competing drafts
//! - [`directory`]: User lookups backing capability checks
//! - [`notify`]: Fire-and-forget workflow notifications

mod access;
pub mod db;
pub mod directory;
pub mod draft;
pub mod errors;
pub mod notify;
pub mod voting;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;
