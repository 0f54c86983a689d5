//! Draft authoring, submission, and quality gating.
//!
//! Each writer of a task owns at most one live draft per round. This module
//! models the draft document and its auxiliary artifacts, the deterministic
//! quality gate that blocks weak submissions, the content isolation policy
//! that keeps competing writers from reading each other mid-round, and the
//! submission handler that feeds the task state machine. Hexagonal layout
//! as elsewhere:
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
