//! Shared storage plumbing for adapters.
//!
//! All contexts persist into one relational store; the Diesel schema lives
//! here so cross-table transactions (submission, resolution, reassignment
//! purge) can be expressed inside a single adapter method. The in-memory
//! mirror in [`memory`] backs service tests with the same one-unit
//! atomicity via a single shared lock.

pub mod memory;
pub mod schema;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;
