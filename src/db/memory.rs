//! Shared in-memory store backing the test adapters.
//!
//! One lock guards the whole state, so an adapter method that touches
//! several entity families (submission, resolution, reassignment purge)
//! commits or fails as a unit, mirroring the transactional behaviour of
//! the `PostgreSQL` adapters.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::draft::domain::{DocumentId, DraftDocument, QualityReport};
use crate::voting::domain::{BinaryVote, Candidate, SessionId, SessionVote, VotingSession};
use crate::workflow::domain::{ReassignmentRecord, Task, TaskId};

/// Full in-memory state, guarded by one lock.
#[derive(Debug, Default)]
pub(crate) struct SharedState {
    pub(crate) tasks: HashMap<TaskId, Task>,
    pub(crate) reassignments: Vec<ReassignmentRecord>,
    pub(crate) drafts: HashMap<DocumentId, DraftDocument>,
    pub(crate) quality_history: HashMap<DocumentId, QualityReport>,
    pub(crate) binary_votes: Vec<BinaryVote>,
    pub(crate) sessions: HashMap<SessionId, VotingSession>,
    pub(crate) candidates: HashMap<SessionId, Vec<Candidate>>,
    pub(crate) session_votes: Vec<SessionVote>,
}

/// Handle to the shared in-memory store.
///
/// Clones share state; each context's memory adapter holds a clone so
/// cross-context operations stay atomic under the single lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDb {
    state: Arc<RwLock<SharedState>>,
}

impl InMemoryDb {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the state for reading.
    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, SharedState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    /// Acquires the state for writing.
    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, SharedState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}
