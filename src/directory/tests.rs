//! Unit tests for directory domain types and the in-memory adapter.

use crate::directory::{
    adapters::memory::InMemoryUserDirectory,
    domain::{Role, UserId, UserProfile},
    ports::UserDirectory,
};
use rstest::rstest;

#[rstest]
#[case("admin", Role::Admin)]
#[case("writer", Role::Writer)]
#[case("annotator", Role::Annotator)]
#[case(" Writer ", Role::Writer)]
fn role_parses_known_values(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(Role::try_from(raw), Ok(expected));
}

#[rstest]
fn role_rejects_unknown_values() {
    assert!(Role::try_from("moderator").is_err());
}

#[rstest]
#[case(Role::Writer, true, true)]
#[case(Role::Annotator, true, true)]
#[case(Role::Admin, true, false)]
#[case(Role::Writer, false, false)]
fn assignable_writer_requires_active_non_admin(
    #[case] role: Role,
    #[case] active: bool,
    #[case] expected: bool,
) {
    let profile = UserProfile::new(UserId::new(), "casey", role, active);
    assert_eq!(profile.is_assignable_writer(), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn memory_directory_returns_registered_profile() -> eyre::Result<()> {
    let directory = InMemoryUserDirectory::new();
    let profile = UserProfile::new(UserId::new(), "morgan", Role::Writer, true);
    directory.insert(profile.clone())?;

    let found = directory.find_user(profile.id()).await?;
    assert_eq!(found, Some(profile));

    let missing = directory.find_user(UserId::new()).await?;
    assert_eq!(missing, None);
    Ok(())
}
