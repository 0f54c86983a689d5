//! Adapter implementations of the voting ports.

pub mod memory;
pub mod postgres;
