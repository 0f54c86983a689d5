//! Adapter implementations of the draft ports.

pub mod memory;
pub mod postgres;
