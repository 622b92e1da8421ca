//! # Build-Metrics Model
//!
//! Shapes emitted by the Gradle build-metrics agent.
//!
//! Every member is optional on the wire. The agent omits whatever it did not
//! collect, so the relay only insists on what validation and translation
//! actually read.

use serde::{Deserialize, Serialize};

// ============================================================================
// Result Status
// ============================================================================

/// Outcome reported for a build or a single test
///
/// Any status string outside the known set classifies as
/// [`ResultValue::Unrecognized`] instead of failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultValue {
    Success,
    Failure,
    Skipped,
    Unknown,
    Unrecognized,
}

impl From<&str> for ResultValue {
    fn from(status: &str) -> Self {
        match status {
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            "SKIPPED" => Self::Skipped,
            "UNKNOWN" => Self::Unknown,
            _ => Self::Unrecognized,
        }
    }
}

impl ResultValue {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Skipped => "SKIPPED",
            Self::Unknown => "UNKNOWN",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }
}

/// Status descriptor as sent by the agent
///
/// The status string is kept exactly as received; [`ResultStatus::value`]
/// classifies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStatus {
    #[serde(default)]
    pub status: Option<String>,
}

impl ResultStatus {
    pub fn new(status: ResultValue) -> Self {
        Self::raw(status.as_str())
    }

    /// Status descriptor carrying an arbitrary status string
    pub fn raw(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
        }
    }

    pub fn value(&self) -> Option<ResultValue> {
        self.status.as_deref().map(ResultValue::from)
    }
}

// ============================================================================
// Tests and Tasks
// ============================================================================

/// Result of a single test method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    #[serde(default)]
    pub class_name: Option<String>,

    #[serde(default)]
    pub method_name: Option<String>,

    #[serde(default)]
    pub suite_name: Option<String>,

    #[serde(default)]
    pub result: Option<ResultStatus>,
}

impl TestResult {
    /// Create a test result with the given names and status
    pub fn new(suite_name: &str, class_name: &str, method_name: &str, status: ResultValue) -> Self {
        Self {
            class_name: Some(class_name.to_string()),
            method_name: Some(method_name.to_string()),
            suite_name: Some(suite_name.to_string()),
            result: Some(ResultStatus::new(status)),
        }
    }

    /// Status of this test; a missing status counts as unknown
    pub fn status(&self) -> ResultValue {
        self.result
            .as_ref()
            .and_then(ResultStatus::value)
            .unwrap_or(ResultValue::Unknown)
    }

    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or_default()
    }

    pub fn method_name(&self) -> &str {
        self.method_name.as_deref().unwrap_or_default()
    }

    pub fn suite_name(&self) -> &str {
        self.suite_name.as_deref().unwrap_or_default()
    }
}

/// A Gradle task executed during the build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// Tool Information
// ============================================================================

/// Toolchain information collected by the agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(default)]
    pub java_version: Option<String>,

    #[serde(default)]
    pub detailed_java_version: Option<String>,

    #[serde(default)]
    pub build: Option<BuildToolInfo>,
}

impl BuildInfo {
    /// Gradle version at `info.build.gradle.version`
    pub fn gradle_version(&self) -> Option<&str> {
        self.build
            .as_ref()
            .and_then(|b| b.gradle.as_ref())
            .and_then(|g| g.version.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildToolInfo {
    #[serde(default)]
    pub gradle: Option<GradleInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradleInfo {
    #[serde(default)]
    pub version: Option<String>,
}

// ============================================================================
// Build Metrics
// ============================================================================

/// The decoded inner build payload
///
/// `project`, `elapsedTime`, `startTime`, `finishedTime` and `testCount` are
/// carried through to the report metadata verbatim, whatever JSON shape the
/// agent used for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetrics {
    #[serde(default)]
    pub build_id: Option<String>,

    #[serde(default)]
    pub project: Option<serde_json::Value>,

    #[serde(default)]
    pub elapsed_time: Option<serde_json::Value>,

    #[serde(default)]
    pub start_time: Option<serde_json::Value>,

    #[serde(default)]
    pub finished_time: Option<serde_json::Value>,

    #[serde(default)]
    pub test_count: Option<serde_json::Value>,

    #[serde(default)]
    pub result: Option<ResultStatus>,

    #[serde(default)]
    pub tests: Option<Vec<TestResult>>,

    #[serde(default)]
    pub tasks: Option<Vec<TaskInfo>>,

    #[serde(default)]
    pub info: Option<BuildInfo>,
}

impl BuildMetrics {
    /// Overall build status, if the agent reported one
    pub fn status(&self) -> Option<ResultValue> {
        self.result.as_ref().and_then(ResultStatus::value)
    }

    /// Overall build status string exactly as the agent sent it
    pub fn raw_status(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.status.as_deref())
    }

    /// Test results, empty when the agent sent none
    pub fn tests(&self) -> &[TestResult] {
        self.tests.as_deref().unwrap_or_default()
    }

    /// Executed tasks, empty when the agent sent none
    pub fn tasks(&self) -> &[TaskInfo] {
        self.tasks.as_deref().unwrap_or_default()
    }

    /// Declared test count, falling back to the number of test entries
    ///
    /// Only a non-negative whole JSON number counts as a declared value.
    pub fn effective_test_count(&self) -> u64 {
        self.test_count
            .as_ref()
            .and_then(declared_count)
            .unwrap_or(self.tests().len() as u64)
    }
}

fn declared_count(value: &serde_json::Value) -> Option<u64> {
    if let Some(count) = value.as_u64() {
        return Some(count);
    }

    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
        .map(|n| n as u64)
}

// ============================================================================
// Build Report
// ============================================================================

/// A build report whose inner payload has been decoded
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub event_name: Option<String>,
    pub build_id: Option<String>,
    pub build: BuildMetrics,
}

impl BuildReport {
    /// Create new build report
    pub fn new(event_name: Option<String>, build_id: Option<String>, build: BuildMetrics) -> Self {
        Self {
            event_name,
            build_id,
            build,
        }
    }

    /// A report is worth forwarding only when it carries a usable build status.
    ///
    /// Failing builds are relevant; only a missing or `UNKNOWN` status is not.
    pub fn is_relevant(&self) -> bool {
        matches!(self.build.status(), Some(status) if status != ResultValue::Unknown)
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
