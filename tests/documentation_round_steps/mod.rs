//! Step definitions for documentation round BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
