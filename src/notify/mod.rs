//! Fire-and-forget workflow notifications.
//!
//! Delivery (mail, in-app inbox, chat) is a platform concern outside this
//! crate; the workflow core only enqueues a message to a recipient inside
//! the same transaction-shaped operation that triggered it. Ports here stay
//! deliberately narrow so service code cannot grow delivery logic.

pub mod adapters;
pub mod domain;
pub mod ports;
