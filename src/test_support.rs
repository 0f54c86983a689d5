//! Shared fixtures for service tests across contexts.

use crate::db::memory::InMemoryDb;
use crate::directory::{
    adapters::memory::InMemoryUserDirectory,
    domain::{Role, UserId, UserProfile},
};
use crate::draft::{
    adapters::memory::InMemoryDraftRepository,
    domain::{ApiTestConfig, DraftBody, UseCaseScript},
    services::{SaveDraftRequest, SubmissionService},
};
use crate::notify::adapters::memory::RecordingNotifier;
use crate::voting::{
    adapters::memory::{InMemoryBinaryVoteRepository, InMemorySessionRepository},
    services::{BinaryVotingService, SessionVotingService},
};
use crate::workflow::{
    adapters::memory::InMemoryWorkflowRepository,
    domain::{Task, TaskId},
    services::{CreateTaskRequest, ReassignmentService, TaskLifecycleService},
};
use chrono::{DateTime, Duration, Local, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Clock pinned to a fixed instant so deadline arithmetic is deterministic.
#[derive(Debug, Clone)]
pub(crate) struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub(crate) fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

pub(crate) type TestLifecycleService = TaskLifecycleService<
    InMemoryWorkflowRepository,
    InMemoryUserDirectory,
    RecordingNotifier,
    FixedClock,
>;
pub(crate) type TestReassignmentService = ReassignmentService<
    InMemoryWorkflowRepository,
    InMemoryUserDirectory,
    RecordingNotifier,
    FixedClock,
>;
pub(crate) type TestSubmissionService = SubmissionService<
    InMemoryDraftRepository,
    InMemoryWorkflowRepository,
    InMemoryUserDirectory,
    RecordingNotifier,
    FixedClock,
>;
pub(crate) type TestBinaryVotingService = BinaryVotingService<
    InMemoryBinaryVoteRepository,
    InMemoryDraftRepository,
    InMemoryWorkflowRepository,
    InMemoryUserDirectory,
    RecordingNotifier,
    FixedClock,
>;
pub(crate) type TestSessionVotingService = SessionVotingService<
    InMemorySessionRepository,
    InMemoryDraftRepository,
    InMemoryWorkflowRepository,
    InMemoryUserDirectory,
    RecordingNotifier,
    FixedClock,
>;

/// Fully wired in-memory world with one admin, two writers, an annotator,
/// and three eligible voters.
pub(crate) struct World {
    pub db: InMemoryDb,
    pub directory: Arc<InMemoryUserDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,
    pub admin: UserId,
    pub annotator: UserId,
    pub writer1: UserId,
    pub writer2: UserId,
    pub voters: [UserId; 3],
}

impl World {
    pub(crate) fn new() -> eyre::Result<Self> {
        let now = "2025-06-02T09:00:00Z".parse::<DateTime<Utc>>()?;
        let directory = Arc::new(InMemoryUserDirectory::new());
        let admin = register(&directory, "ailsa", Role::Admin, true)?;
        let annotator = register(&directory, "noor", Role::Annotator, true)?;
        let writer1 = register(&directory, "piet", Role::Writer, true)?;
        let writer2 = register(&directory, "sanne", Role::Writer, true)?;
        let voters = [
            register(&directory, "vera", Role::Writer, true)?,
            register(&directory, "wim", Role::Annotator, true)?,
            register(&directory, "yusuf", Role::Writer, true)?,
        ];
        Ok(Self {
            db: InMemoryDb::default(),
            directory,
            notifier: Arc::new(RecordingNotifier::new()),
            clock: Arc::new(FixedClock::at(now)),
            admin,
            annotator,
            writer1,
            writer2,
            voters,
        })
    }

    pub(crate) fn register_user(&self, name: &str, role: Role, active: bool) -> eyre::Result<UserId> {
        register(&self.directory, name, role, active)
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    pub(crate) fn deadline(&self) -> DateTime<Utc> {
        self.now() + Duration::days(7)
    }

    pub(crate) fn workflow_repository(&self) -> Arc<InMemoryWorkflowRepository> {
        Arc::new(InMemoryWorkflowRepository::new(self.db.clone()))
    }

    pub(crate) fn draft_repository(&self) -> Arc<InMemoryDraftRepository> {
        Arc::new(InMemoryDraftRepository::new(self.db.clone()))
    }

    pub(crate) fn lifecycle_service(&self) -> TestLifecycleService {
        TaskLifecycleService::new(
            self.workflow_repository(),
            self.directory.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        )
    }

    pub(crate) fn reassignment_service(&self) -> TestReassignmentService {
        ReassignmentService::new(
            self.workflow_repository(),
            self.directory.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        )
    }

    pub(crate) fn submission_service(&self) -> TestSubmissionService {
        SubmissionService::new(
            self.draft_repository(),
            self.workflow_repository(),
            self.directory.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        )
    }

    pub(crate) fn binary_voting_service(&self) -> TestBinaryVotingService {
        BinaryVotingService::new(
            Arc::new(InMemoryBinaryVoteRepository::new(self.db.clone())),
            self.draft_repository(),
            self.workflow_repository(),
            self.directory.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        )
    }

    pub(crate) fn session_voting_service(&self) -> TestSessionVotingService {
        SessionVotingService::new(
            Arc::new(InMemorySessionRepository::new(self.db.clone())),
            self.draft_repository(),
            self.workflow_repository(),
            self.directory.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        )
    }

    /// Creates a task assigned to the world's standard cast.
    pub(crate) async fn create_task(&self) -> eyre::Result<Task> {
        let request = CreateTaskRequest::new(
            "billing::invoice::finalize",
            "Document invoice finalization",
            self.annotator,
            self.writer1,
            self.writer2,
        )
        .with_description("Cover rounding and currency edge cases")
        .with_deadline(self.deadline());
        Ok(self.lifecycle_service().create_task(self.admin, request).await?)
    }

    /// Creates a task and moves it to `in_progress` via writer acceptance.
    pub(crate) async fn create_accepted_task(&self) -> eyre::Result<Task> {
        let task = self.create_task().await?;
        let task = self
            .lifecycle_service()
            .accept_task(task.id(), self.writer1)
            .await?;
        Ok(task)
    }

    /// Saves and submits a gate-passing draft for the given writer.
    pub(crate) async fn submit_passing_draft(
        &self,
        task_id: TaskId,
        author: UserId,
    ) -> eyre::Result<crate::draft::domain::DocumentId> {
        let service = self.submission_service();
        let draft = service
            .save_draft(author, passing_draft_request(task_id))
            .await?;
        service.submit_draft(author, draft.id()).await?;
        Ok(draft.id())
    }
}

fn register(
    directory: &InMemoryUserDirectory,
    name: &str,
    role: Role,
    active: bool,
) -> eyre::Result<UserId> {
    let profile = UserProfile::new(UserId::new(), name, role, active);
    let id = profile.id();
    directory.insert(profile)?;
    Ok(id)
}

/// A draft request rich enough to clear every quality check.
pub(crate) fn passing_draft_request(task_id: TaskId) -> SaveDraftRequest {
    let overview = "## Overview\n\nThe finalize endpoint settles an invoice and freezes its \
                    line items. It validates the currency, applies the rounding policy, and \
                    emits a settlement event for downstream ledgers."
        .to_owned();
    let implementation = "## Implementation\n\nRounding follows banker's rounding at two \
                          decimal places. The handler acquires a row lock before recomputing \
                          totals so concurrent edits cannot interleave.\n\n```rust\nlet total \
                          = invoice.lines.iter().map(Line::amount).sum();\n```"
        .to_owned();
    let usage = "## Usage\n\nCall POST /invoices/{id}/finalize with an idempotency key. \
                 Repeated calls with the same key return the original settlement."
        .to_owned();
    SaveDraftRequest {
        task_id,
        title: "Finalizing invoices".to_owned(),
        body: DraftBody::Wiki {
            overview,
            implementation,
            usage,
        },
        api_configs: vec![ApiTestConfig::new(
            0,
            "finalize happy path",
            "POST",
            "/invoices/{id}/finalize",
            Some(200),
        )],
        use_case_scripts: vec![UseCaseScript::new(
            0,
            "settle a monthly invoice",
            "1. Create an invoice\n2. Add two lines\n3. Call finalize\n4. Assert totals",
        )],
    }
}
