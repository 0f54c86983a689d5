//! Domain model for draft documents and their quality rules.

mod artifact;
mod document;
mod error;
mod ids;
mod quality;
mod status;
mod visibility;

pub use artifact::{ApiTestConfig, UseCaseScript};
pub use document::{DraftBody, DraftDocument, PersistedDraftData};
pub use error::{DraftDomainError, ParseDraftStatusError, ParseVerdictError};
pub use ids::DocumentId;
pub use quality::{CheckResult, QualityReport, SUBMIT_THRESHOLD, Verdict, evaluate};
pub use status::DraftStatus;
pub use visibility::{DraftView, Viewer, view_for};
