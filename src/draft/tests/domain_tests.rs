//! Unit tests for the draft document aggregate and its status machine.

use crate::directory::domain::UserId;
use crate::draft::domain::{
    ApiTestConfig, DraftBody, DraftDocument, DraftDomainError, DraftStatus, UseCaseScript,
};
use crate::test_support::FixedClock;
use crate::workflow::domain::{RoundNumber, TaskId};
use chrono::{DateTime, Utc};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    let now = "2025-06-02T09:00:00Z"
        .parse::<DateTime<Utc>>()
        .expect("valid timestamp");
    FixedClock::at(now)
}

fn entry_body(content: &str) -> DraftBody {
    DraftBody::Entry {
        content: content.to_owned(),
    }
}

fn fresh_draft(clock: &FixedClock) -> DraftDocument {
    DraftDocument::new(
        TaskId::new(),
        RoundNumber::FIRST,
        UserId::new(),
        "Refund flow",
        entry_body("initial content"),
        clock,
    )
}

#[rstest]
#[case(DraftStatus::Draft, DraftStatus::Submitted, true)]
#[case(DraftStatus::Submitted, DraftStatus::Selected, true)]
#[case(DraftStatus::Submitted, DraftStatus::Rejected, true)]
#[case(DraftStatus::Draft, DraftStatus::Selected, false)]
#[case(DraftStatus::Draft, DraftStatus::Rejected, false)]
#[case(DraftStatus::Submitted, DraftStatus::Draft, false)]
#[case(DraftStatus::Selected, DraftStatus::Rejected, false)]
#[case(DraftStatus::Rejected, DraftStatus::Draft, false)]
fn status_changes_follow_the_table(
    #[case] from: DraftStatus,
    #[case] to: DraftStatus,
    #[case] expected: bool,
) {
    assert_eq!(from.can_change_to(to), expected);
}

#[rstest]
#[case(DraftStatus::Draft, true)]
#[case(DraftStatus::Submitted, true)]
#[case(DraftStatus::Selected, true)]
#[case(DraftStatus::Rejected, false)]
fn only_rejected_drafts_stop_being_live(#[case] status: DraftStatus, #[case] expected: bool) {
    assert_eq!(status.is_live(), expected);
}

#[rstest]
fn wiki_bodies_join_sections_in_order() {
    let body = DraftBody::Wiki {
        overview: "first".to_owned(),
        implementation: "second".to_owned(),
        usage: "third".to_owned(),
    };
    assert_eq!(body.full_text(), "first\nsecond\nthird");
}

#[rstest]
fn replace_content_updates_an_unsubmitted_draft(clock: FixedClock) {
    let mut draft = fresh_draft(&clock);
    draft
        .replace_content("Revised title", entry_body("revised"), &clock)
        .expect("draft is editable");
    assert_eq!(draft.title(), "Revised title");
    assert_eq!(draft.body(), &entry_body("revised"));
}

#[rstest]
fn replace_artifacts_reorders_by_position(clock: FixedClock) {
    let mut draft = fresh_draft(&clock);
    draft
        .replace_artifacts(
            vec![
                ApiTestConfig::new(1, "second", "GET", "/b", Some(200)),
                ApiTestConfig::new(0, "first", "GET", "/a", Some(200)),
            ],
            vec![
                UseCaseScript::new(2, "late", "steps"),
                UseCaseScript::new(0, "early", "steps"),
            ],
            &clock,
        )
        .expect("draft is editable");
    assert_eq!(draft.api_configs()[0].name(), "first");
    assert_eq!(draft.use_case_scripts()[0].title(), "early");
}

#[rstest]
fn submit_locks_further_edits(clock: FixedClock) {
    let mut draft = fresh_draft(&clock);
    draft.submit(&clock).expect("unsubmitted draft may submit");
    assert_eq!(draft.status(), DraftStatus::Submitted);
    assert_eq!(draft.submitted_at(), Some(draft.updated_at()));
    assert!(draft.is_submitted());

    assert!(matches!(
        draft.replace_content("late edit", entry_body("nope"), &clock),
        Err(DraftDomainError::NotEditable { .. })
    ));
    assert!(matches!(
        draft.replace_artifacts(Vec::new(), Vec::new(), &clock),
        Err(DraftDomainError::NotEditable { .. })
    ));
}

#[rstest]
fn submit_is_a_once_only_action(clock: FixedClock) {
    let mut draft = fresh_draft(&clock);
    draft.submit(&clock).expect("first submission succeeds");
    assert!(matches!(
        draft.submit(&clock),
        Err(DraftDomainError::InvalidStatusChange { .. })
    ));
}

#[rstest]
fn resolution_requires_a_submitted_draft(clock: FixedClock) {
    let mut draft = fresh_draft(&clock);
    assert!(matches!(
        draft.mark_selected(&clock),
        Err(DraftDomainError::InvalidStatusChange { .. })
    ));
    assert!(matches!(
        draft.mark_rejected(&clock),
        Err(DraftDomainError::InvalidStatusChange { .. })
    ));
}

#[rstest]
fn incomplete_api_configs_are_detected() {
    let complete = ApiTestConfig::new(0, "ok", "POST", "/x", Some(201));
    let missing_status = ApiTestConfig::new(1, "no status", "POST", "/x", None);
    let blank_name = ApiTestConfig::new(2, "  ", "POST", "/x", Some(200));
    assert!(complete.is_complete());
    assert!(!missing_status.is_complete());
    assert!(!blank_name.is_complete());
}
