//! Service layer for draft editing, the quality gate, and submission.

use crate::access::require_user;
use crate::directory::{domain::UserId, ports::UserDirectory};
use crate::draft::{
    domain::{
        ApiTestConfig, DocumentId, DraftBody, DraftDocument, DraftView, QualityReport,
        UseCaseScript, Viewer, evaluate, view_for,
    },
    ports::DraftRepository,
};
use crate::errors::{OperationError, OperationResult};
use crate::notify::{
    domain::{Notification, NotificationKind},
    ports::Notifier,
};
use crate::workflow::{
    domain::{Task, TaskId, TaskStatus},
    ports::WorkflowRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating or updating a writer's draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDraftRequest {
    /// Task the draft belongs to.
    pub task_id: TaskId,
    /// Draft title.
    pub title: String,
    /// Draft body.
    pub body: DraftBody,
    /// API test configurations, any order.
    pub api_configs: Vec<ApiTestConfig>,
    /// Use-case scripts, any order.
    pub use_case_scripts: Vec<UseCaseScript>,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// The now-locked draft.
    pub draft: DraftDocument,
    /// The owning task, possibly advanced to `pending_vote`.
    pub task: Task,
    /// The passing quality run.
    pub report: QualityReport,
}

/// Orchestrates draft editing, quality gating, and submission.
#[derive(Clone)]
pub struct SubmissionService<R, W, D, N, C>
where
    R: DraftRepository,
    W: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    drafts: Arc<R>,
    workflow: Arc<W>,
    directory: Arc<D>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, W, D, N, C> SubmissionService<R, W, D, N, C>
where
    R: DraftRepository,
    W: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new submission service.
    #[must_use]
    pub const fn new(
        drafts: Arc<R>,
        workflow: Arc<W>,
        directory: Arc<D>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            drafts,
            workflow,
            directory,
            notifier,
            clock,
        }
    }

    /// Creates or updates the acting writer's live draft for a task.
    ///
    /// The first save creates the draft; later saves replace its content
    /// and artifacts in place. Only assigned writers may edit, and only
    /// while the task is `in_progress`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown tasks,
    /// [`OperationError::InvalidState`] outside `in_progress`,
    /// [`OperationError::Forbidden`] for non-writers, or a storage error
    /// from persistence.
    pub async fn save_draft(
        &self,
        actor: UserId,
        request: SaveDraftRequest,
    ) -> OperationResult<DraftDocument> {
        let task = self.find_task(request.task_id).await?;
        if task.status() != TaskStatus::InProgress {
            return Err(OperationError::invalid_state(
                "save a draft",
                task.status().as_str(),
            ));
        }
        if !task.writers().contains(actor) {
            return Err(OperationError::Forbidden {
                action: "edit drafts on this task",
                actor,
            });
        }

        let mut draft = match self.drafts.find_live_draft(task.id(), actor).await? {
            Some(mut existing) => {
                existing.replace_content(request.title, request.body, &*self.clock)?;
                existing
            }
            None => DraftDocument::new(
                task.id(),
                task.round(),
                actor,
                request.title,
                request.body,
                &*self.clock,
            ),
        };
        draft.replace_artifacts(request.api_configs, request.use_case_scripts, &*self.clock)?;
        self.drafts.save(&draft).await?;
        tracing::debug!(document_id = %draft.id(), task_id = %task.id(), "draft saved");
        Ok(draft)
    }

    /// Runs the quality gate against a draft and records the run.
    ///
    /// Writers may gate their own drafts; admins may gate any draft.
    /// Each run replaces the previously recorded one.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown drafts or
    /// [`OperationError::Forbidden`] for other actors.
    pub async fn run_quality_check(
        &self,
        actor: UserId,
        document_id: DocumentId,
    ) -> OperationResult<QualityReport> {
        let profile = require_user(&*self.directory, actor).await?;
        let draft = self.find_draft(document_id).await?;
        if draft.author() != actor && !profile.is_admin() {
            return Err(OperationError::Forbidden {
                action: "run the quality gate on this draft",
                actor,
            });
        }
        let report = evaluate(&draft);
        self.drafts
            .replace_quality_history(draft.id(), &report)
            .await?;
        Ok(report)
    }

    /// Submits the author's draft, advancing the task when the round is
    /// complete.
    ///
    /// Submission runs the quality gate first and is refused outright when
    /// the gate fails. Once both writers have submitted, or the deadline
    /// has passed with at least one submission, the task moves to
    /// `pending_vote` and the assigning admin is notified.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown drafts,
    /// [`OperationError::Forbidden`] for non-authors,
    /// [`OperationError::InvalidState`] outside `in_progress`, or
    /// [`OperationError::QualityGateFailed`] with the full check list.
    pub async fn submit_draft(
        &self,
        actor: UserId,
        document_id: DocumentId,
    ) -> OperationResult<SubmissionOutcome> {
        let mut draft = self.find_draft(document_id).await?;
        if draft.author() != actor {
            return Err(OperationError::Forbidden {
                action: "submit this draft",
                actor,
            });
        }
        let mut task = self.find_task(draft.task_id()).await?;
        if task.status() != TaskStatus::InProgress {
            return Err(OperationError::invalid_state(
                "submit a draft",
                task.status().as_str(),
            ));
        }

        let report = evaluate(&draft);
        if !report.can_submit() {
            return Err(OperationError::QualityGateFailed { report });
        }
        draft.submit(&*self.clock)?;

        let peers_submitted = self
            .drafts
            .find_by_task(task.id())
            .await?
            .iter()
            .filter(|other| {
                other.id() != draft.id()
                    && other.round() == task.round()
                    && other.is_submitted()
            })
            .count();
        let round_complete = peers_submitted + 1 >= 2 || task.is_overdue(&*self.clock);
        if round_complete {
            task.transition_to(TaskStatus::PendingVote, &*self.clock)?;
        }

        self.drafts.submit(&draft, &task, &report).await?;

        if round_complete {
            self.notifier
                .enqueue(Notification::new(
                    task.assigned_by(),
                    NotificationKind::VotingReady,
                    format!("task '{}' is ready for version voting", task.title()),
                ))
                .await?;
        }
        tracing::info!(
            document_id = %draft.id(),
            task_id = %task.id(),
            score = report.aggregate_score(),
            round_complete,
            "draft submitted"
        );
        Ok(SubmissionOutcome {
            draft,
            task,
            report,
        })
    }

    /// Returns a draft filtered by the content isolation policy.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown users, drafts, or
    /// tasks.
    pub async fn view_draft(
        &self,
        actor: UserId,
        document_id: DocumentId,
    ) -> OperationResult<DraftView> {
        let profile = require_user(&*self.directory, actor).await?;
        let draft = self.find_draft(document_id).await?;
        let task = self.find_task(draft.task_id()).await?;
        Ok(view_for(
            &draft,
            task.status(),
            Viewer::new(actor, profile.role()),
        ))
    }

    /// Returns all drafts of a task, each filtered by the content
    /// isolation policy, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown users or tasks.
    pub async fn drafts_for_task(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> OperationResult<Vec<DraftView>> {
        let profile = require_user(&*self.directory, actor).await?;
        let task = self.find_task(task_id).await?;
        let viewer = Viewer::new(actor, profile.role());
        Ok(self
            .drafts
            .find_by_task(task_id)
            .await?
            .iter()
            .map(|draft| view_for(draft, task.status(), viewer))
            .collect())
    }

    /// Returns the most recently recorded quality run for a draft.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown drafts.
    pub async fn last_quality_report(
        &self,
        document_id: DocumentId,
    ) -> OperationResult<Option<QualityReport>> {
        let draft = self.find_draft(document_id).await?;
        Ok(self.drafts.quality_history(draft.id()).await?)
    }

    async fn find_task(&self, task_id: TaskId) -> OperationResult<Task> {
        self.workflow
            .find_by_id(task_id)
            .await?
            .ok_or(OperationError::NotFound {
                entity: "task",
                id: task_id.into_inner(),
            })
    }

    async fn find_draft(&self, document_id: DocumentId) -> OperationResult<DraftDocument> {
        self.drafts
            .find_by_id(document_id)
            .await?
            .ok_or(OperationError::NotFound {
                entity: "draft",
                id: document_id.into_inner(),
            })
    }
}
