//! Shared world state for documentation round BDD scenarios.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use scriptorium::db::memory::InMemoryDb;
use scriptorium::directory::{
    adapters::memory::InMemoryUserDirectory,
    domain::{Role, UserId, UserProfile},
};
use scriptorium::draft::{
    adapters::memory::InMemoryDraftRepository,
    domain::{ApiTestConfig, DocumentId, DraftBody, DraftView, UseCaseScript},
    services::{SaveDraftRequest, SubmissionOutcome, SubmissionService},
};
use scriptorium::errors::OperationError;
use scriptorium::notify::adapters::memory::RecordingNotifier;
use scriptorium::voting::{
    adapters::memory::{InMemoryBinaryVoteRepository, InMemorySessionRepository},
    domain::{Candidate, VotingSession},
    services::{BinaryResolution, BinaryVotingService, SessionOutcome, SessionVotingService},
};
use scriptorium::workflow::{
    adapters::memory::InMemoryWorkflowRepository,
    domain::{Task, TaskId},
    services::{CreateTaskRequest, TaskLifecycleService},
};

/// Lifecycle service type used by the BDD world.
pub type WorldLifecycleService = TaskLifecycleService<
    InMemoryWorkflowRepository,
    InMemoryUserDirectory,
    RecordingNotifier,
    DefaultClock,
>;

/// Submission service type used by the BDD world.
pub type WorldSubmissionService = SubmissionService<
    InMemoryDraftRepository,
    InMemoryWorkflowRepository,
    InMemoryUserDirectory,
    RecordingNotifier,
    DefaultClock,
>;

/// Binary voting service type used by the BDD world.
pub type WorldBinaryService = BinaryVotingService<
    InMemoryBinaryVoteRepository,
    InMemoryDraftRepository,
    InMemoryWorkflowRepository,
    InMemoryUserDirectory,
    RecordingNotifier,
    DefaultClock,
>;

/// Session voting service type used by the BDD world.
pub type WorldSessionService = SessionVotingService<
    InMemorySessionRepository,
    InMemoryDraftRepository,
    InMemoryWorkflowRepository,
    InMemoryUserDirectory,
    RecordingNotifier,
    DefaultClock,
>;

/// Scenario world for documentation round behaviour tests.
pub struct RoundWorld {
    pub lifecycle: WorldLifecycleService,
    pub submission: WorldSubmissionService,
    pub binary: WorldBinaryService,
    pub sessions: WorldSessionService,
    pub admin: UserId,
    pub annotator: UserId,
    pub writer1: UserId,
    pub writer2: UserId,
    pub reviewers: [UserId; 3],
    pub task: Option<Task>,
    pub first_draft: Option<DocumentId>,
    pub second_draft: Option<DocumentId>,
    pub session: Option<VotingSession>,
    pub candidates: Vec<Candidate>,
    pub last_submission: Option<Result<SubmissionOutcome, OperationError>>,
    pub last_resolution: Option<Result<BinaryResolution, OperationError>>,
    pub last_session_end: Option<Result<SessionOutcome, OperationError>>,
    pub last_view: Option<DraftView>,
}

impl RoundWorld {
    /// Wires services over one shared in-memory store and registers the
    /// scenario cast.
    pub fn new() -> eyre::Result<Self> {
        let db = InMemoryDb::new();
        let directory = Arc::new(InMemoryUserDirectory::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(DefaultClock);

        let admin = register(&directory, "margriet", Role::Admin)?;
        let annotator = register(&directory, "teun", Role::Annotator)?;
        let writer1 = register(&directory, "femke", Role::Writer)?;
        let writer2 = register(&directory, "ruben", Role::Writer)?;
        let reviewers = [
            register(&directory, "lotte", Role::Writer)?,
            register(&directory, "bruno", Role::Annotator)?,
            register(&directory, "ines", Role::Writer)?,
        ];

        let workflow = Arc::new(InMemoryWorkflowRepository::new(db.clone()));
        let drafts = Arc::new(InMemoryDraftRepository::new(db.clone()));

        let lifecycle = TaskLifecycleService::new(
            workflow.clone(),
            directory.clone(),
            notifier.clone(),
            clock.clone(),
        );
        let submission = SubmissionService::new(
            drafts.clone(),
            workflow.clone(),
            directory.clone(),
            notifier.clone(),
            clock.clone(),
        );
        let binary = BinaryVotingService::new(
            Arc::new(InMemoryBinaryVoteRepository::new(db.clone())),
            drafts.clone(),
            workflow.clone(),
            directory.clone(),
            notifier.clone(),
            clock.clone(),
        );
        let sessions = SessionVotingService::new(
            Arc::new(InMemorySessionRepository::new(db)),
            drafts,
            workflow,
            directory,
            notifier,
            clock,
        );

        Ok(Self {
            lifecycle,
            submission,
            binary,
            sessions,
            admin,
            annotator,
            writer1,
            writer2,
            reviewers,
            task: None,
            first_draft: None,
            second_draft: None,
            session: None,
            candidates: Vec::new(),
            last_submission: None,
            last_resolution: None,
            last_session_end: None,
            last_view: None,
        })
    }

    /// Returns the scenario task or fails the step.
    pub fn task_id(&self) -> eyre::Result<TaskId> {
        self.task
            .as_ref()
            .map(Task::id)
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Builds a create request for the scenario cast with a week's
    /// deadline.
    pub fn create_request(&self) -> CreateTaskRequest {
        CreateTaskRequest::new(
            "catalogue::pricing::recalculate",
            "Document price recalculation",
            self.annotator,
            self.writer1,
            self.writer2,
        )
        .with_description("Cover discount stacking and tax rounding")
        .with_deadline(Utc::now() + Duration::days(7))
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RoundWorld {
    RoundWorld::new().expect("scenario world")
}

fn register(
    directory: &InMemoryUserDirectory,
    name: &str,
    role: Role,
) -> eyre::Result<UserId> {
    let profile = UserProfile::new(UserId::new(), name, role, true);
    let id = profile.id();
    directory.insert(profile)?;
    Ok(id)
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// A draft request substantial enough to clear every quality check.
pub fn passing_draft(task_id: TaskId) -> SaveDraftRequest {
    let overview = "## Overview\n\nRecalculation replays every price rule against the \
                    current catalogue entry. Discounts stack in rule order and the final \
                    amount is rounded once, after tax, never per line."
        .to_owned();
    let implementation = "## Implementation\n\nThe handler loads the rule chain inside a \
                          repeatable-read transaction and folds it over the base price, so \
                          a concurrent rule edit cannot produce a half-applied total.\n\n\
                          ```rust\nlet total = rules.iter().fold(base, |acc, rule| \
                          rule.apply(acc));\n```"
        .to_owned();
    let usage = "## Usage\n\nCall POST /catalogue/{id}/recalculate after editing rules. \
                 The response carries the new price and the rule ids that fired."
        .to_owned();
    SaveDraftRequest {
        task_id,
        title: "Recalculating catalogue prices".to_owned(),
        body: DraftBody::Wiki {
            overview,
            implementation,
            usage,
        },
        api_configs: vec![ApiTestConfig::new(
            0,
            "recalculate after rule edit",
            "POST",
            "/catalogue/{id}/recalculate",
            Some(200),
        )],
        use_case_scripts: vec![UseCaseScript::new(
            0,
            "reprice after a seasonal discount",
            "1. Create an entry\n2. Attach a discount rule\n3. Recalculate\n4. Assert the total",
        )],
    }
}

/// A draft request thin enough to fail the gate's content-length check.
pub fn thin_draft(task_id: TaskId) -> SaveDraftRequest {
    SaveDraftRequest {
        task_id,
        title: "Prices".to_owned(),
        body: DraftBody::Entry {
            content: "Recalculates prices.\nReturns the total.".to_owned(),
        },
        api_configs: Vec::new(),
        use_case_scripts: Vec::new(),
    }
}
