//! Task lifecycle management for the documentation workflow.
//!
//! A task binds one function to one code annotator and two competing
//! writers. This module owns the authoritative task status state machine,
//! task creation and acceptance, and the atomic reassignment procedure that
//! starts a new round after a failed vote. The module follows hexagonal
//! architecture:
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
