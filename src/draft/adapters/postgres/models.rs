//! Diesel row models for draft persistence.

use crate::db::schema::{api_test_configs, draft_documents, quality_check_results, use_case_scripts};
use crate::directory::domain::UserId;
use crate::draft::{
    domain::{
        ApiTestConfig, CheckResult, DocumentId, DraftBody, DraftDocument, DraftStatus,
        PersistedDraftData, QualityReport, UseCaseScript, Verdict,
    },
    ports::{DraftRepositoryError, DraftRepositoryResult},
};
use crate::workflow::domain::{RoundNumber, TaskId};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

/// Row model for draft documents, usable for both reads and writes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = draft_documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DraftRow {
    /// Document identifier.
    pub id: Uuid,
    /// Owning task.
    pub task_id: Uuid,
    /// Assignment round.
    pub round: i32,
    /// Authoring writer.
    pub author: Uuid,
    /// Document title.
    pub title: String,
    /// Body payload in its serialized shape.
    pub body: Value,
    /// Draft status in storage form.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    pub updated_at: DateTime<Utc>,
    /// Submission timestamp, if submitted.
    pub submitted_at: Option<DateTime<Utc>>,
}

impl DraftRow {
    /// Flattens a draft aggregate into its row form.
    ///
    /// # Errors
    ///
    /// Returns [`DraftRepositoryError::Persistence`] when the body fails to
    /// serialize.
    pub fn from_draft(draft: &DraftDocument) -> DraftRepositoryResult<Self> {
        let body = serde_json::to_value(draft.body()).map_err(DraftRepositoryError::persistence)?;
        Ok(Self {
            id: draft.id().into_inner(),
            task_id: draft.task_id().into_inner(),
            round: draft.round().value().cast_signed(),
            author: draft.author().into_inner(),
            title: draft.title().to_owned(),
            body,
            status: draft.status().as_str().to_owned(),
            created_at: draft.created_at(),
            updated_at: draft.updated_at(),
            submitted_at: draft.submitted_at(),
        })
    }

    /// Rebuilds the draft aggregate with its artifact collections.
    pub fn into_draft(
        self,
        api_configs: Vec<ApiTestConfig>,
        use_case_scripts: Vec<UseCaseScript>,
    ) -> DraftRepositoryResult<DraftDocument> {
        let status = DraftStatus::try_from(self.status.as_str())
            .map_err(DraftRepositoryError::persistence)?;
        let body: DraftBody =
            serde_json::from_value(self.body).map_err(DraftRepositoryError::persistence)?;
        let round = u32::try_from(self.round)
            .map_err(DraftRepositoryError::persistence)
            .and_then(|value| RoundNumber::new(value).map_err(DraftRepositoryError::persistence))?;

        Ok(DraftDocument::from_persisted(PersistedDraftData {
            id: DocumentId::from_uuid(self.id),
            task_id: TaskId::from_uuid(self.task_id),
            round,
            author: UserId::from_uuid(self.author),
            title: self.title,
            body,
            status,
            api_configs,
            use_case_scripts,
            created_at: self.created_at,
            updated_at: self.updated_at,
            submitted_at: self.submitted_at,
        }))
    }
}

/// Row model for API test configs.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = api_test_configs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApiConfigRow {
    /// Config identifier.
    pub id: Uuid,
    /// Owning document.
    pub document_id: Uuid,
    /// Explicit ordering index.
    pub position: i32,
    /// Test name.
    pub name: String,
    /// HTTP method.
    pub method: String,
    /// Endpoint path.
    pub endpoint: String,
    /// Expected response status, if configured.
    pub expected_status: Option<i32>,
}

impl ApiConfigRow {
    /// Flattens a config into its row form with a fresh row id.
    #[must_use]
    pub fn from_config(document_id: DocumentId, config: &ApiTestConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document_id.into_inner(),
            position: config.position().cast_signed(),
            name: config.name().to_owned(),
            method: config.method().to_owned(),
            endpoint: config.endpoint().to_owned(),
            expected_status: config.expected_status().map(i32::from),
        }
    }

    /// Rebuilds the config value object.
    pub fn into_config(self) -> DraftRepositoryResult<ApiTestConfig> {
        let position =
            u32::try_from(self.position).map_err(DraftRepositoryError::persistence)?;
        let expected_status = self
            .expected_status
            .map(u16::try_from)
            .transpose()
            .map_err(DraftRepositoryError::persistence)?;
        Ok(ApiTestConfig::new(
            position,
            self.name,
            self.method,
            self.endpoint,
            expected_status,
        ))
    }
}

/// Row model for use-case scripts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = use_case_scripts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScriptRow {
    /// Script identifier.
    pub id: Uuid,
    /// Owning document.
    pub document_id: Uuid,
    /// Explicit ordering index.
    pub position: i32,
    /// Script title.
    pub title: String,
    /// Script body.
    pub script: String,
}

impl ScriptRow {
    /// Flattens a script into its row form with a fresh row id.
    #[must_use]
    pub fn from_script(document_id: DocumentId, script: &UseCaseScript) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document_id.into_inner(),
            position: script.position().cast_signed(),
            title: script.title().to_owned(),
            script: script.script().to_owned(),
        }
    }

    /// Rebuilds the script value object.
    pub fn into_script(self) -> DraftRepositoryResult<UseCaseScript> {
        let position =
            u32::try_from(self.position).map_err(DraftRepositoryError::persistence)?;
        Ok(UseCaseScript::new(position, self.title, self.script))
    }
}

/// Row model for persisted quality-check results.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = quality_check_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QualityCheckRow {
    /// Row identifier.
    pub id: Uuid,
    /// Checked document.
    pub document_id: Uuid,
    /// Position of the check within the run.
    pub position: i32,
    /// Check name.
    pub check_name: String,
    /// Severity tag in storage form.
    pub verdict: String,
    /// 0-100 check score.
    pub score: i32,
    /// Human-readable detail.
    pub detail: String,
    /// Aggregate score of the run, denormalised onto each row.
    pub aggregate_score: i32,
    /// Whether the run permitted submission.
    pub can_submit: bool,
}

impl QualityCheckRow {
    /// Flattens one report into rows, one per check.
    #[must_use]
    pub fn from_report(document_id: DocumentId, report: &QualityReport) -> Vec<Self> {
        report
            .checks()
            .iter()
            .enumerate()
            .map(|(index, check)| Self {
                id: Uuid::new_v4(),
                document_id: document_id.into_inner(),
                position: i32::try_from(index).unwrap_or(i32::MAX),
                check_name: check.name().to_owned(),
                verdict: check.verdict().as_str().to_owned(),
                score: i32::from(check.score()),
                detail: check.detail().to_owned(),
                aggregate_score: i32::from(report.aggregate_score()),
                can_submit: report.can_submit(),
            })
            .collect()
    }

    /// Rebuilds a report from its ordered rows.
    ///
    /// Returns `None` for an empty row set.
    pub fn into_report(rows: Vec<Self>) -> DraftRepositoryResult<Option<QualityReport>> {
        let Some(first) = rows.first() else {
            return Ok(None);
        };
        let aggregate_score =
            u8::try_from(first.aggregate_score).map_err(DraftRepositoryError::persistence)?;
        let can_submit = first.can_submit;
        let checks = rows
            .into_iter()
            .map(|row| {
                let verdict = Verdict::try_from(row.verdict.as_str())
                    .map_err(DraftRepositoryError::persistence)?;
                let score = u8::try_from(row.score).map_err(DraftRepositoryError::persistence)?;
                Ok(CheckResult::new(row.check_name, verdict, score, row.detail))
            })
            .collect::<DraftRepositoryResult<Vec<_>>>()?;
        Ok(Some(QualityReport::from_persisted(
            checks,
            aggregate_score,
            can_submit,
        )))
    }
}
