//! Voting over competing drafts.
//!
//! Two subsystems resolve the same decision: a binary per-task vote between
//! exactly two submitted drafts, and a longer-lived session wrapping N
//! candidates with admin-controlled start and end. Both feed one shared
//! resolution strategy ([`domain::Tally`]) so winner selection and tie
//! handling cannot drift apart. Hexagonal layout as elsewhere:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
