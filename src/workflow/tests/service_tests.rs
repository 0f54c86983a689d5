//! Service orchestration tests for task creation and acceptance.

use crate::directory::domain::Role;
use crate::errors::OperationError;
use crate::notify::domain::NotificationKind;
use crate::test_support::World;
use crate::workflow::domain::{RoundNumber, TaskStatus};
use crate::workflow::services::CreateTaskRequest;
use rstest::{fixture, rstest};

#[fixture]
fn world() -> World {
    World::new().expect("world fixture")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_persists_and_is_retrievable(world: World) -> eyre::Result<()> {
    let service = world.lifecycle_service();
    let created = world.create_task().await?;

    let fetched = service.find_task(created.id()).await?;
    assert_eq!(fetched, Some(created.clone()));
    assert_eq!(created.status(), TaskStatus::NotStarted);
    assert_eq!(created.round(), RoundNumber::FIRST);
    assert_eq!(created.annotator(), world.annotator);
    assert!(created.writers().contains(world.writer1));
    assert!(created.writers().contains(world.writer2));
    assert_eq!(created.assigned_by(), world.admin);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_notifies_writers_and_annotator(world: World) -> eyre::Result<()> {
    world.create_task().await?;

    let sent = world.notifier.sent()?;
    assert_eq!(sent.len(), 3);
    assert!(sent
        .iter()
        .all(|notice| notice.kind() == NotificationKind::TaskAssigned));
    let recipients: Vec<_> = sent.iter().map(|notice| notice.recipient()).collect();
    assert!(recipients.contains(&world.writer1));
    assert!(recipients.contains(&world.writer2));
    assert!(recipients.contains(&world.annotator));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_requires_an_admin_actor(world: World) -> eyre::Result<()> {
    let request = CreateTaskRequest::new(
        "payments::refund",
        "Document the refund flow",
        world.annotator,
        world.writer1,
        world.writer2,
    );
    let result = world
        .lifecycle_service()
        .create_task(world.writer1, request)
        .await;
    assert!(matches!(result, Err(OperationError::Forbidden { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_identical_writers(world: World) -> eyre::Result<()> {
    let request = CreateTaskRequest::new(
        "payments::refund",
        "Document the refund flow",
        world.annotator,
        world.writer1,
        world.writer1,
    );
    let result = world
        .lifecycle_service()
        .create_task(world.admin, request)
        .await;
    assert!(matches!(result, Err(OperationError::Validation(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_admins_in_writer_slots(world: World) -> eyre::Result<()> {
    let second_admin = world.register_user("oded", Role::Admin, true)?;
    let request = CreateTaskRequest::new(
        "payments::refund",
        "Document the refund flow",
        world.annotator,
        second_admin,
        world.writer2,
    );
    let result = world
        .lifecycle_service()
        .create_task(world.admin, request)
        .await;
    assert!(matches!(result, Err(OperationError::Validation(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_inactive_annotators(world: World) -> eyre::Result<()> {
    let dormant = world.register_user("lena", Role::Annotator, false)?;
    let request = CreateTaskRequest::new(
        "payments::refund",
        "Document the refund flow",
        dormant,
        world.writer1,
        world.writer2,
    );
    let result = world
        .lifecycle_service()
        .create_task(world.admin, request)
        .await;
    assert!(matches!(result, Err(OperationError::Validation(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_annotator_doubling_as_writer(world: World) -> eyre::Result<()> {
    let request = CreateTaskRequest::new(
        "payments::refund",
        "Document the refund flow",
        world.annotator,
        world.annotator,
        world.writer2,
    );
    let result = world
        .lifecycle_service()
        .create_task(world.admin, request)
        .await;
    assert!(matches!(result, Err(OperationError::Validation(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accept_task_moves_the_task_to_in_progress(world: World) -> eyre::Result<()> {
    let task = world.create_task().await?;
    let accepted = world
        .lifecycle_service()
        .accept_task(task.id(), world.writer2)
        .await?;
    assert_eq!(accepted.status(), TaskStatus::InProgress);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accept_task_rejects_users_outside_the_writer_pair(world: World) -> eyre::Result<()> {
    let task = world.create_task().await?;
    let result = world
        .lifecycle_service()
        .accept_task(task.id(), world.voters[0])
        .await;
    assert!(matches!(result, Err(OperationError::Forbidden { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accept_task_rejects_a_second_acceptance(world: World) -> eyre::Result<()> {
    let task = world.create_accepted_task().await?;
    let result = world
        .lifecycle_service()
        .accept_task(task.id(), world.writer2)
        .await;
    assert!(matches!(result, Err(OperationError::InvalidState { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_task_returns_none_for_unknown_ids(world: World) -> eyre::Result<()> {
    let found = world
        .lifecycle_service()
        .find_task(crate::workflow::domain::TaskId::new())
        .await?;
    assert_eq!(found, None);
    Ok(())
}
