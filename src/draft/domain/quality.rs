//! Deterministic quality gate for draft documents.
//!
//! The gate is a pure function over a draft and its artifacts: running it
//! twice on unmodified input yields byte-identical results. It is consulted
//! at submission time to block weak drafts and exposed independently for
//! on-demand checks, with results persisted per document by the repository.

use super::{ApiTestConfig, DraftDocument, ParseVerdictError, UseCaseScript};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum aggregate score required to submit.
pub const SUBMIT_THRESHOLD: u8 = 60;

/// Content length below which the draft errors outright.
const CONTENT_ERROR_CHARS: usize = 100;
/// Content length below which the draft draws a warning.
const CONTENT_WARNING_CHARS: usize = 500;

/// Titles that read as unfilled placeholders.
const PLACEHOLDER_TITLES: [&str; 5] = ["untitled", "todo", "tbd", "placeholder", "new document"];

/// Structural headings the gate looks for in the body.
const STRUCTURAL_HEADINGS: [&str; 3] = ["overview", "implementation", "usage"];

/// Severity tag of one check outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The check is satisfied.
    Pass,
    /// The check found an issue that does not block submission.
    Warning,
    /// The check found an issue that blocks submission.
    Error,
}

impl Verdict {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl TryFrom<&str> for Verdict {
    type Error = ParseVerdictError;

    fn try_from(value: &str) -> Result<Self, ParseVerdictError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pass" => Ok(Self::Pass),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(ParseVerdictError(value.to_owned())),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one quality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    name: String,
    verdict: Verdict,
    score: u8,
    detail: String,
}

impl CheckResult {
    /// Creates a check result; scores are clamped to 0–100.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        verdict: Verdict,
        score: u8,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            verdict,
            score: score.min(100),
            detail: detail.into(),
        }
    }

    /// Returns the check name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the severity tag.
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns the 0–100 check score.
    #[must_use]
    pub const fn score(&self) -> u8 {
        self.score
    }

    /// Returns the human-readable detail.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Full gate output for one evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    checks: Vec<CheckResult>,
    aggregate_score: u8,
    can_submit: bool,
}

impl QualityReport {
    /// Reconstructs a report from persisted rows.
    #[must_use]
    pub const fn from_persisted(
        checks: Vec<CheckResult>,
        aggregate_score: u8,
        can_submit: bool,
    ) -> Self {
        Self {
            checks,
            aggregate_score,
            can_submit,
        }
    }

    /// Returns the ordered check results.
    #[must_use]
    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// Returns the aggregate score: the arithmetic mean of all check
    /// scores, rounded to the nearest integer.
    #[must_use]
    pub const fn aggregate_score(&self) -> u8 {
        self.aggregate_score
    }

    /// Returns whether submission is permitted: aggregate at or above
    /// [`SUBMIT_THRESHOLD`] and no check at [`Verdict::Error`].
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.can_submit
    }

    /// Returns whether any check errored.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.verdict() == Verdict::Error)
    }
}

/// Evaluates the quality gate over a draft and its artifacts.
#[must_use]
pub fn evaluate(document: &DraftDocument) -> QualityReport {
    let text = document.body().full_text();
    let checks = vec![
        check_title(document.title()),
        check_content_length(&text),
        check_structure(&text),
        check_code_blocks(&text),
        check_api_configs(document.api_configs()),
        check_use_case_scripts(document.use_case_scripts()),
        check_endpoint_consistency(&text, document.api_configs()),
    ];

    let aggregate_score = mean_score(&checks);
    let has_error = checks
        .iter()
        .any(|check| check.verdict() == Verdict::Error);
    let can_submit = aggregate_score >= SUBMIT_THRESHOLD && !has_error;

    QualityReport {
        checks,
        aggregate_score,
        can_submit,
    }
}

/// Arithmetic mean of check scores, rounded to nearest.
fn mean_score(checks: &[CheckResult]) -> u8 {
    let count = u32::try_from(checks.len()).unwrap_or(u32::MAX);
    if count == 0 {
        return 0;
    }
    let sum: u32 = checks.iter().map(|check| u32::from(check.score())).sum();
    let mean = (sum + count / 2) / count;
    u8::try_from(mean).unwrap_or(100)
}

fn check_title(title: &str) -> CheckResult {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return CheckResult::new("title", Verdict::Error, 0, "title is empty");
    }
    let lowered = trimmed.to_lowercase();
    if PLACEHOLDER_TITLES
        .iter()
        .any(|placeholder| lowered == *placeholder)
    {
        return CheckResult::new(
            "title",
            Verdict::Error,
            0,
            format!("title '{trimmed}' is a placeholder"),
        );
    }
    CheckResult::new("title", Verdict::Pass, 100, "title is set")
}

fn check_content_length(text: &str) -> CheckResult {
    let chars = text.chars().count();
    if chars < CONTENT_ERROR_CHARS {
        return CheckResult::new(
            "content_length",
            Verdict::Error,
            20,
            format!("content is {chars} characters, minimum is {CONTENT_ERROR_CHARS}"),
        );
    }
    if chars < CONTENT_WARNING_CHARS {
        return CheckResult::new(
            "content_length",
            Verdict::Warning,
            60,
            format!("content is {chars} characters, aim for {CONTENT_WARNING_CHARS} or more"),
        );
    }
    CheckResult::new(
        "content_length",
        Verdict::Pass,
        100,
        format!("content is {chars} characters"),
    )
}

fn check_structure(text: &str) -> CheckResult {
    let heading_lines: Vec<String> = text
        .lines()
        .filter(|line| line.trim_start().starts_with('#'))
        .map(str::to_lowercase)
        .collect();
    let found = STRUCTURAL_HEADINGS
        .iter()
        .filter(|heading| heading_lines.iter().any(|line| line.contains(**heading)))
        .count();

    let score = u8::try_from(40 + found * 20).unwrap_or(100);
    if found == STRUCTURAL_HEADINGS.len() {
        CheckResult::new(
            "structure",
            Verdict::Pass,
            score,
            "overview, implementation, and usage headings present",
        )
    } else {
        CheckResult::new(
            "structure",
            Verdict::Warning,
            score,
            format!(
                "{found} of {} structural headings present",
                STRUCTURAL_HEADINGS.len()
            ),
        )
    }
}

fn check_code_blocks(text: &str) -> CheckResult {
    let fences = text.matches("```").count();
    let blocks = fences / 2;
    if blocks == 0 {
        CheckResult::new(
            "code_blocks",
            Verdict::Warning,
            50,
            "no fenced code blocks found",
        )
    } else {
        CheckResult::new(
            "code_blocks",
            Verdict::Pass,
            100,
            format!("{blocks} fenced code block(s) found"),
        )
    }
}

fn check_api_configs(configs: &[ApiTestConfig]) -> CheckResult {
    if configs.is_empty() {
        return CheckResult::new(
            "api_configs",
            Verdict::Error,
            0,
            "at least one API test config is required",
        );
    }
    let complete = configs
        .iter()
        .filter(|config| config.is_complete())
        .count();
    let total = configs.len();
    let score = ratio_score(complete, total);
    if complete == total {
        CheckResult::new(
            "api_configs",
            Verdict::Pass,
            score,
            format!("{total} complete API test config(s)"),
        )
    } else {
        CheckResult::new(
            "api_configs",
            Verdict::Warning,
            score,
            format!("{complete} of {total} API test configs have all fields set"),
        )
    }
}

fn check_use_case_scripts(scripts: &[UseCaseScript]) -> CheckResult {
    if scripts.is_empty() {
        return CheckResult::new(
            "use_case_scripts",
            Verdict::Warning,
            30,
            "no use-case scripts provided",
        );
    }
    let total: usize = scripts.iter().map(script_quality).sum();
    let score = u8::try_from(total / scripts.len()).unwrap_or(100);
    if score >= SUBMIT_THRESHOLD {
        CheckResult::new(
            "use_case_scripts",
            Verdict::Pass,
            score,
            format!("{} use-case script(s) with substantive steps", scripts.len()),
        )
    } else {
        CheckResult::new(
            "use_case_scripts",
            Verdict::Warning,
            score,
            "use-case scripts are thin, add concrete steps",
        )
    }
}

/// Heuristic 0–100 content score for one script: titled scripts with more
/// non-empty step lines score higher.
fn script_quality(script: &UseCaseScript) -> usize {
    let steps = script
        .script()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count();
    let title_bonus = if script.title().trim().is_empty() { 0 } else { 20 };
    (20 + title_bonus + steps * 12).min(100)
}

fn check_endpoint_consistency(text: &str, configs: &[ApiTestConfig]) -> CheckResult {
    if configs.is_empty() {
        return CheckResult::new(
            "endpoint_consistency",
            Verdict::Warning,
            0,
            "no configured endpoints to cross-reference",
        );
    }
    let lowered = text.to_lowercase();
    let referenced = configs
        .iter()
        .filter(|config| {
            let name = config.name().trim().to_lowercase();
            let endpoint = config.endpoint().trim().to_lowercase();
            (!name.is_empty() && lowered.contains(&name))
                || (!endpoint.is_empty() && lowered.contains(&endpoint))
        })
        .count();
    let total = configs.len();
    let score = ratio_score(referenced, total);
    if referenced == total {
        CheckResult::new(
            "endpoint_consistency",
            Verdict::Pass,
            score,
            "document references every configured endpoint",
        )
    } else {
        CheckResult::new(
            "endpoint_consistency",
            Verdict::Warning,
            score,
            format!("document references {referenced} of {total} configured endpoints"),
        )
    }
}

/// Scales `part / total` to 0–100, rounded to nearest.
fn ratio_score(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (part * 100 + total / 2) / total;
    u8::try_from(scaled).unwrap_or(100)
}
