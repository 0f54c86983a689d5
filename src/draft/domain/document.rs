//! Draft document aggregate.

use super::{ApiTestConfig, DocumentId, DraftDomainError, DraftStatus, UseCaseScript};
use crate::directory::domain::UserId;
use crate::workflow::domain::{RoundNumber, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Document body in one of the two supported shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DraftBody {
    /// Wiki content with three fixed sections.
    Wiki {
        /// Overview section text.
        overview: String,
        /// Implementation section text.
        implementation: String,
        /// Usage section text.
        usage: String,
    },
    /// A free-form entry document.
    Entry {
        /// Markdown content.
        content: String,
    },
}

impl DraftBody {
    /// Returns the full body text for length and content heuristics.
    ///
    /// Wiki sections are joined in section order.
    #[must_use]
    pub fn full_text(&self) -> String {
        match self {
            Self::Wiki {
                overview,
                implementation,
                usage,
            } => format!("{overview}\n{implementation}\n{usage}"),
            Self::Entry { content } => content.clone(),
        }
    }
}

/// A single writer's draft for one task round.
///
/// Owned exclusively by its author; at most one non-rejected draft exists
/// per (task, writer), an invariant the repository enforces on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDocument {
    id: DocumentId,
    task_id: TaskId,
    round: RoundNumber,
    author: UserId,
    title: String,
    body: DraftBody,
    status: DraftStatus,
    api_configs: Vec<ApiTestConfig>,
    use_case_scripts: Vec<UseCaseScript>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDraftData {
    /// Persisted document identifier.
    pub id: DocumentId,
    /// Persisted owning task.
    pub task_id: TaskId,
    /// Persisted assignment round.
    pub round: RoundNumber,
    /// Persisted author.
    pub author: UserId,
    /// Persisted title.
    pub title: String,
    /// Persisted body.
    pub body: DraftBody,
    /// Persisted status.
    pub status: DraftStatus,
    /// Persisted API test configs in position order.
    pub api_configs: Vec<ApiTestConfig>,
    /// Persisted use-case scripts in position order.
    pub use_case_scripts: Vec<UseCaseScript>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest edit timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted submission timestamp, if submitted.
    pub submitted_at: Option<DateTime<Utc>>,
}

impl DraftDocument {
    /// Creates a fresh, empty-status draft for a writer.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        round: RoundNumber,
        author: UserId,
        title: impl Into<String>,
        body: DraftBody,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: DocumentId::new(),
            task_id,
            round,
            author,
            title: title.into(),
            body,
            status: DraftStatus::Draft,
            api_configs: Vec::new(),
            use_case_scripts: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
            submitted_at: None,
        }
    }

    /// Reconstructs a draft from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDraftData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            round: data.round,
            author: data.author,
            title: data.title,
            body: data.body,
            status: data.status,
            api_configs: data.api_configs,
            use_case_scripts: data.use_case_scripts,
            created_at: data.created_at,
            updated_at: data.updated_at,
            submitted_at: data.submitted_at,
        }
    }

    /// Returns the document identifier.
    #[must_use]
    pub const fn id(&self) -> DocumentId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the assignment round this draft belongs to.
    #[must_use]
    pub const fn round(&self) -> RoundNumber {
        self.round
    }

    /// Returns the authoring writer.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the document title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the document body.
    #[must_use]
    pub const fn body(&self) -> &DraftBody {
        &self.body
    }

    /// Returns the draft status.
    #[must_use]
    pub const fn status(&self) -> DraftStatus {
        self.status
    }

    /// Returns the API test configs in position order.
    #[must_use]
    pub fn api_configs(&self) -> &[ApiTestConfig] {
        &self.api_configs
    }

    /// Returns the use-case scripts in position order.
    #[must_use]
    pub fn use_case_scripts(&self) -> &[UseCaseScript] {
        &self.use_case_scripts
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest edit timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns when the draft was submitted, if it was.
    #[must_use]
    pub const fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// Returns whether the draft has been submitted for voting.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(
            self.status,
            DraftStatus::Submitted | DraftStatus::Selected | DraftStatus::Rejected
        )
    }

    /// Replaces the title and body of an unsubmitted draft.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDomainError::NotEditable`] once submitted.
    pub fn replace_content(
        &mut self,
        title: impl Into<String>,
        body: DraftBody,
        clock: &impl Clock,
    ) -> Result<(), DraftDomainError> {
        self.ensure_editable()?;
        self.title = title.into();
        self.body = body;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the artifact collections of an unsubmitted draft.
    ///
    /// Artifacts are re-indexed to their supplied order.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDomainError::NotEditable`] once submitted.
    pub fn replace_artifacts(
        &mut self,
        api_configs: Vec<ApiTestConfig>,
        use_case_scripts: Vec<UseCaseScript>,
        clock: &impl Clock,
    ) -> Result<(), DraftDomainError> {
        self.ensure_editable()?;
        self.api_configs = api_configs;
        self.api_configs.sort_by_key(ApiTestConfig::position);
        self.use_case_scripts = use_case_scripts;
        self.use_case_scripts.sort_by_key(UseCaseScript::position);
        self.touch(clock);
        Ok(())
    }

    /// Marks the draft submitted, locking further edits.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDomainError::InvalidStatusChange`] unless the draft is
    /// unsubmitted.
    pub fn submit(&mut self, clock: &impl Clock) -> Result<(), DraftDomainError> {
        self.change_status(DraftStatus::Submitted, clock)?;
        self.submitted_at = Some(self.updated_at);
        Ok(())
    }

    /// Marks the draft as the winning, canonical version.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDomainError::InvalidStatusChange`] unless submitted.
    pub fn mark_selected(&mut self, clock: &impl Clock) -> Result<(), DraftDomainError> {
        self.change_status(DraftStatus::Selected, clock)
    }

    /// Marks the draft rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDomainError::InvalidStatusChange`] unless submitted.
    pub fn mark_rejected(&mut self, clock: &impl Clock) -> Result<(), DraftDomainError> {
        self.change_status(DraftStatus::Rejected, clock)
    }

    fn change_status(
        &mut self,
        target: DraftStatus,
        clock: &impl Clock,
    ) -> Result<(), DraftDomainError> {
        if !self.status.can_change_to(target) {
            return Err(DraftDomainError::InvalidStatusChange {
                document_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), DraftDomainError> {
        if self.status != DraftStatus::Draft {
            return Err(DraftDomainError::NotEditable {
                document_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
