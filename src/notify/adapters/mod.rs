//! Adapter implementations of the notifier port.

pub mod memory;
