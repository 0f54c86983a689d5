//! Auxiliary artifacts attached to a draft document.
//!
//! Artifacts belong to exactly one document and keep an explicit position
//! index so their order survives persistence. Field completeness is a
//! quality-gate concern, not a construction invariant: writers save partial
//! configs while drafting and the gate flags the gaps at submission time.

use serde::{Deserialize, Serialize};

/// One configured API test for the documented function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTestConfig {
    position: u32,
    name: String,
    method: String,
    endpoint: String,
    expected_status: Option<u16>,
}

impl ApiTestConfig {
    /// Creates an API test config at the given position.
    #[must_use]
    pub fn new(
        position: u32,
        name: impl Into<String>,
        method: impl Into<String>,
        endpoint: impl Into<String>,
        expected_status: Option<u16>,
    ) -> Self {
        Self {
            position,
            name: name.into(),
            method: method.into(),
            endpoint: endpoint.into(),
            expected_status,
        }
    }

    /// Returns the explicit ordering index.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Returns the test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the endpoint path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the expected response status, if configured.
    #[must_use]
    pub const fn expected_status(&self) -> Option<u16> {
        self.expected_status
    }

    /// Returns whether every field carries a usable value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.method.trim().is_empty()
            && !self.endpoint.trim().is_empty()
            && self.expected_status.is_some()
    }
}

/// One use-case script illustrating the documented function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseScript {
    position: u32,
    title: String,
    script: String,
}

impl UseCaseScript {
    /// Creates a use-case script at the given position.
    #[must_use]
    pub fn new(position: u32, title: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            position,
            title: title.into(),
            script: script.into(),
        }
    }

    /// Returns the explicit ordering index.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Returns the script title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the script body.
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }
}
