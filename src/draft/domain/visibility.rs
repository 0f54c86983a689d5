//! Content isolation policy for competing drafts.
//!
//! While a task is in progress, each writer works blind to the sibling
//! draft: requests for it succeed, but substantive fields come back as
//! `None` so progress signals (existence, status, timestamps, artifact
//! counts) remain observable without leaking content. The policy is a pure
//! function evaluated on every read; callers must not cache its output
//! across status changes.

use super::{ApiTestConfig, DocumentId, DraftBody, DraftDocument, DraftStatus, UseCaseScript};
use crate::directory::domain::{Role, UserId};
use crate::workflow::domain::{RoundNumber, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The identity on whose behalf a draft is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// The requesting user.
    pub id: UserId,
    /// The requesting user's role.
    pub role: Role,
}

impl Viewer {
    /// Creates a viewer identity.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Possibly-redacted read model of a draft.
///
/// Substantive fields are `Option`s: `None` means redacted by policy, never
/// absent data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftView {
    /// Document identifier.
    pub id: DocumentId,
    /// Owning task.
    pub task_id: TaskId,
    /// Assignment round.
    pub round: RoundNumber,
    /// Authoring writer.
    pub author: UserId,
    /// Draft status.
    pub status: DraftStatus,
    /// Title, redacted while isolated.
    pub title: Option<String>,
    /// Body, redacted while isolated.
    pub body: Option<DraftBody>,
    /// API configs, redacted while isolated.
    pub api_configs: Option<Vec<ApiTestConfig>>,
    /// Use-case scripts, redacted while isolated.
    pub use_case_scripts: Option<Vec<UseCaseScript>>,
    /// Count of API configs, always visible.
    pub api_config_count: usize,
    /// Count of use-case scripts, always visible.
    pub use_case_script_count: usize,
    /// Creation timestamp, always visible.
    pub created_at: DateTime<Utc>,
    /// Latest edit timestamp, always visible.
    pub updated_at: DateTime<Utc>,
    /// Submission timestamp, always visible for progress tracking.
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Projects a draft for a viewer under the isolation policy.
///
/// Full visibility: admins, the draft author, and everyone once the task
/// has left `InProgress` (statuses `PendingVote`, `Voting`, `Completed`,
/// `PendingReassignment`). `NotStarted` has no drafts to show, so only the
/// in-progress case redacts.
#[must_use]
pub fn view_for(document: &DraftDocument, task_status: TaskStatus, viewer: Viewer) -> DraftView {
    let full = viewer.role == Role::Admin
        || viewer.id == document.author()
        || task_status != TaskStatus::InProgress;

    DraftView {
        id: document.id(),
        task_id: document.task_id(),
        round: document.round(),
        author: document.author(),
        status: document.status(),
        title: full.then(|| document.title().to_owned()),
        body: full.then(|| document.body().clone()),
        api_configs: full.then(|| document.api_configs().to_vec()),
        use_case_scripts: full.then(|| document.use_case_scripts().to_vec()),
        api_config_count: document.api_configs().len(),
        use_case_script_count: document.use_case_scripts().len(),
        created_at: document.created_at(),
        updated_at: document.updated_at(),
        submitted_at: document.submitted_at(),
    }
}
