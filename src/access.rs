//! Capability checks shared by the orchestration services.
//!
//! Authentication happened upstream; these helpers only answer whether the
//! already-identified actor holds the capability an operation demands.

use crate::directory::domain::{UserId, UserProfile};
use crate::directory::ports::UserDirectory;
use crate::errors::{OperationError, OperationResult};

/// Looks up an actor, failing with `NotFound` for unknown users.
pub(crate) async fn require_user<D>(directory: &D, actor: UserId) -> OperationResult<UserProfile>
where
    D: UserDirectory + ?Sized,
{
    directory
        .find_user(actor)
        .await?
        .ok_or(OperationError::NotFound {
            entity: "user",
            id: actor.into_inner(),
        })
}

/// Requires an active account, failing with `Forbidden` otherwise.
pub(crate) async fn require_active_user<D>(
    directory: &D,
    actor: UserId,
    action: &'static str,
) -> OperationResult<UserProfile>
where
    D: UserDirectory + ?Sized,
{
    let profile = require_user(directory, actor).await?;
    if !profile.is_active() {
        return Err(OperationError::Forbidden { action, actor });
    }
    Ok(profile)
}

/// Requires an active admin account, failing with `Forbidden` otherwise.
pub(crate) async fn require_admin<D>(
    directory: &D,
    actor: UserId,
    action: &'static str,
) -> OperationResult<UserProfile>
where
    D: UserDirectory + ?Sized,
{
    let profile = require_active_user(directory, actor, action).await?;
    if !profile.is_admin() {
        return Err(OperationError::Forbidden { action, actor });
    }
    Ok(profile)
}

/// Requires a user assignable as writer: active and non-admin.
pub(crate) async fn require_assignable_writer<D>(
    directory: &D,
    candidate: UserId,
) -> OperationResult<UserProfile>
where
    D: UserDirectory + ?Sized,
{
    let profile = require_user(directory, candidate).await?;
    if !profile.is_assignable_writer() {
        return Err(OperationError::Validation(format!(
            "user {candidate} is not an active non-admin writer"
        )));
    }
    Ok(profile)
}
