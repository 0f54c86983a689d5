//! Application services for draft authoring and submission.

mod submission;

pub use submission::{SaveDraftRequest, SubmissionOutcome, SubmissionService};
