//! # Canonical Report Model
//!
//! The analysis report shape shared by every source plugin of the CI-status
//! aggregation platform, and the source coordinate it pertains to.

use crate::metrics::ResultValue;
use crate::CorrelationId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Source Coordinate
// ============================================================================

/// The (owner, repository, commit, branch) tuple a report pertains to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCoordinate {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    pub branch: Vec<String>,
}

impl SourceCoordinate {
    /// Create new source coordinate
    pub fn new(owner: &str, repo: &str, sha: &str, branch: Vec<String>) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            sha: sha.to_string(),
            branch,
        }
    }

    /// Names of the required members that are empty
    ///
    /// The branch requirement is met by at least one non-empty branch name.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.owner.is_empty() {
            missing.push("owner");
        }
        if self.repo.is_empty() {
            missing.push("repo");
        }
        if self.sha.is_empty() {
            missing.push("sha");
        }
        if !self.branch.iter().any(|name| !name.is_empty()) {
            missing.push("branch");
        }

        missing
    }

    /// Check whether every required member is populated
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

// ============================================================================
// Report Vocabulary
// ============================================================================

/// Overall verdict of an analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Passed,
    Blocked,
}

impl CheckStatus {
    /// Only a successful build passes; every other status blocks.
    pub fn from_build_status(status: Option<ResultValue>) -> Self {
        match status {
            Some(ResultValue::Success) => Self::Passed,
            _ => Self::Blocked,
        }
    }
}

/// Severity of a single annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Major,
    Blocker,
}

/// A single human-readable finding attached to a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub title: String,
    pub detail: String,
    pub severity: Severity,
}

// ============================================================================
// Canonical Analysis Report
// ============================================================================

/// Report shape consumed by the aggregation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAnalysisReport {
    /// Context identifier of the sending plugin
    pub sender: String,
    pub source: SourceCoordinate,
    pub check_status: CheckStatus,
    pub title: String,
    pub uuid: CorrelationId,
    pub metadata: serde_json::Value,
    pub annotations: Vec<Annotation>,
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
