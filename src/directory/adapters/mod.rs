//! Adapter implementations of the user directory port.

pub mod memory;
