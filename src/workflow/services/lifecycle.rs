//! Service layer for task creation, acceptance, and retrieval.

use crate::access::{require_admin, require_assignable_writer, require_user};
use crate::directory::{domain::UserId, ports::UserDirectory};
use crate::errors::{OperationError, OperationResult};
use crate::notify::{
    domain::{Notification, NotificationKind},
    ports::Notifier,
};
use crate::workflow::{
    domain::{FunctionRef, NewTaskParams, Task, TaskId, WriterPair},
    ports::WorkflowRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating a documentation task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    function_ref: String,
    title: String,
    description: String,
    annotator: UserId,
    writer1: UserId,
    writer2: UserId,
    deadline: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with required assignment fields.
    #[must_use]
    pub fn new(
        function_ref: impl Into<String>,
        title: impl Into<String>,
        annotator: UserId,
        writer1: UserId,
        writer2: UserId,
    ) -> Self {
        Self {
            function_ref: function_ref.into(),
            title: title.into(),
            description: String::new(),
            annotator,
            writer1,
            writer2,
            deadline: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the submission deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, D, N, C>
where
    R: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<D>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, D, N, C> TaskLifecycleService<R, D, N, C>
where
    R: WorkflowRepository,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, directory: Arc<D>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            notifier,
            clock,
        }
    }

    /// Creates a task and notifies its assignees. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Forbidden`] for non-admin actors,
    /// [`OperationError::Validation`] for identical or non-assignable
    /// writers, or a storage error from persistence.
    pub async fn create_task(
        &self,
        actor: UserId,
        request: CreateTaskRequest,
    ) -> OperationResult<Task> {
        require_admin(&*self.directory, actor, "create a task").await?;
        let writers = WriterPair::new(request.writer1, request.writer2)?;
        require_assignable_writer(&*self.directory, request.writer1).await?;
        require_assignable_writer(&*self.directory, request.writer2).await?;
        let annotator = require_user(&*self.directory, request.annotator).await?;
        if !annotator.is_active() {
            return Err(OperationError::Validation(format!(
                "annotator {} is not an active user",
                request.annotator
            )));
        }

        let params = NewTaskParams {
            function_ref: FunctionRef::new(request.function_ref)?,
            title: request.title,
            description: request.description,
            annotator: request.annotator,
            writers,
            assigned_by: actor,
            deadline: request.deadline,
        };
        let task = Task::create(params, &*self.clock)?;
        self.repository.store(&task).await?;

        let mut notices: Vec<Notification> = task
            .writers()
            .both()
            .into_iter()
            .map(|writer| {
                Notification::new(
                    writer,
                    NotificationKind::TaskAssigned,
                    format!("you were assigned as a writer on '{}'", task.title()),
                )
            })
            .collect();
        notices.push(Notification::new(
            task.annotator(),
            NotificationKind::TaskAssigned,
            format!("you were assigned as the annotator on '{}'", task.title()),
        ));
        self.notifier.enqueue_all(notices).await?;

        tracing::info!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Records a writer accepting a task, moving it to `in_progress`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] for unknown tasks,
    /// [`OperationError::Forbidden`] when the actor is not an assigned
    /// writer, or [`OperationError::InvalidState`] outside `not_started`.
    pub async fn accept_task(&self, task_id: TaskId, actor: UserId) -> OperationResult<Task> {
        let mut task = self.find_required(task_id).await?;
        task.accept(actor, &*self.clock)?;
        self.repository.update(&task).await?;
        tracing::info!(task_id = %task.id(), writer = %actor, "task accepted");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> OperationResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    async fn find_required(&self, task_id: TaskId) -> OperationResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(OperationError::NotFound {
                entity: "task",
                id: task_id.into_inner(),
            })
    }
}
