//! User directory lookups for capability checks.
//!
//! Authentication and account management live outside this crate; the
//! workflow core only needs to answer "who is this actor and may they do
//! that here". The [`ports::UserDirectory`] port exposes exactly that
//! surface, backed in production by the platform's account store and in
//! tests by [`adapters::memory::InMemoryUserDirectory`].

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
