//! # Report Translator
//!
//! Turns a validated [`BuildReport`] into a [`CanonicalAnalysisReport`] and
//! hands it to the injected [`ReportSender`].
//!
//! Translation is a pure function of the report, the source coordinate, the
//! correlation ID and the sender context. Delivery is the only asynchronous
//! step.

use crate::delivery::{DeliveryError, ReportSender};
use crate::metrics::{BuildInfo, BuildMetrics, BuildReport, ResultValue, TestResult};
use crate::report::{Annotation, CanonicalAnalysisReport, CheckStatus, Severity, SourceCoordinate};
use crate::CorrelationId;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

const FAILED_TEST_PREFIX: &str = "Failed Test";
const SKIPPED_TEST_PREFIX: &str = "Skipped Test";

// ============================================================================
// Result Counting
// ============================================================================

/// Per-status test tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCount {
    pub failed: u64,
    pub skipped: u64,
    pub success: u64,
    pub unknown: u64,
}

impl ResultCount {
    /// Tally tests in a single pass
    ///
    /// `UNKNOWN`, missing and unrecognized statuses all count as unknown.
    pub fn from_tests(tests: &[TestResult]) -> Self {
        tests.iter().fold(Self::default(), |mut counts, test| {
            match test.status() {
                ResultValue::Failure => counts.failed += 1,
                ResultValue::Success => counts.success += 1,
                ResultValue::Skipped => counts.skipped += 1,
                ResultValue::Unknown | ResultValue::Unrecognized => counts.unknown += 1,
            }
            counts
        })
    }

    /// Total number of tallied tests
    pub fn total(&self) -> u64 {
        self.failed + self.skipped + self.success + self.unknown
    }
}

// ============================================================================
// Annotations and Title
// ============================================================================

/// Extract annotations: all failed tests, then all skipped tests
///
/// A build without a `tests` member yields no annotations.
pub fn collect_annotations(build: &BuildMetrics) -> Vec<Annotation> {
    let Some(tests) = build.tests.as_deref() else {
        return Vec::new();
    };

    let mut annotations = annotations_for(
        tests,
        ResultValue::Failure,
        Severity::Blocker,
        FAILED_TEST_PREFIX,
    );
    annotations.extend(annotations_for(
        tests,
        ResultValue::Skipped,
        Severity::Info,
        SKIPPED_TEST_PREFIX,
    ));
    annotations
}

fn annotations_for(
    tests: &[TestResult],
    status: ResultValue,
    severity: Severity,
    title_prefix: &str,
) -> Vec<Annotation> {
    tests
        .iter()
        .filter(|test| test.status() == status)
        .map(|test| Annotation {
            title: format!(
                "{}: {} {}",
                title_prefix,
                test.class_name(),
                test.method_name()
            ),
            detail: format!(
                "{} {} {}",
                test.suite_name(),
                test.class_name(),
                test.method_name()
            ),
            severity,
        })
        .collect()
}

/// Compose the report title, e.g. `"10 Tests, 1 skipped, 2 failed"`
pub fn compose_title(test_count: u64, counts: &ResultCount) -> String {
    let mut title = format!("{} Tests", test_count);

    if counts.skipped > 0 {
        title.push_str(&format!(", {} skipped", counts.skipped));
    }

    if counts.failed > 0 {
        title.push_str(&format!(", {} failed", counts.failed));
    }

    title
}

/// Build the free-form report metadata
///
/// The success tally is not part of the metadata.
fn build_metadata(build: &BuildMetrics, counts: &ResultCount) -> serde_json::Value {
    let info = build.info.as_ref();
    let tasks: Vec<Option<&str>> = build
        .tasks()
        .iter()
        .map(|task| task.description.as_deref())
        .collect();

    json!({
        "project": build.project,
        "java": {
            "version": info.and_then(|i| i.java_version.as_deref()),
            "detailVersion": info.and_then(|i| i.detailed_java_version.as_deref()),
        },
        "gradle": {
            "version": info.and_then(BuildInfo::gradle_version),
        },
        "build": {
            "id": build.build_id,
            "elapsedTime": build.elapsed_time,
            "startTime": build.start_time,
            "finishedTime": build.finished_time,
            "result": build.raw_status(),
            "tasks": tasks,
        },
        "test": {
            "count": build.test_count,
            "failed": counts.failed,
            "skipped": counts.skipped,
            "unknown": counts.unknown,
        }
    })
}

// ============================================================================
// Translator
// ============================================================================

/// Translates build reports and dispatches them to the aggregation service
pub struct ReportTranslator {
    context: String,
    sender: Arc<dyn ReportSender>,
}

impl ReportTranslator {
    /// Create new translator
    ///
    /// # Arguments
    ///
    /// * `context` - Sender identifier stamped on every report
    /// * `sender` - Outbound client the reports are handed to
    pub fn new(context: impl Into<String>, sender: Arc<dyn ReportSender>) -> Self {
        Self {
            context: context.into(),
            sender,
        }
    }

    /// Sender identifier stamped on every report
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Assemble the canonical report without sending it
    pub fn translate(
        &self,
        report: &BuildReport,
        source: &SourceCoordinate,
        correlation_id: CorrelationId,
    ) -> CanonicalAnalysisReport {
        let build = &report.build;
        let counts = ResultCount::from_tests(build.tests());

        CanonicalAnalysisReport {
            sender: self.context.clone(),
            source: source.clone(),
            check_status: CheckStatus::from_build_status(build.status()),
            title: compose_title(build.effective_test_count(), &counts),
            uuid: correlation_id,
            metadata: build_metadata(build, &counts),
            annotations: collect_annotations(build),
        }
    }

    /// Translate the report and hand it to the outbound client
    ///
    /// Returns the outcome of the single delivery attempt.
    #[instrument(skip_all, fields(correlation_id = %correlation_id))]
    pub async fn send_report(
        &self,
        report: &BuildReport,
        source: &SourceCoordinate,
        correlation_id: CorrelationId,
    ) -> Result<(), DeliveryError> {
        let analysis = self.translate(report, source, correlation_id);

        info!(
            owner = %analysis.source.owner,
            repo = %analysis.source.repo,
            sha = %analysis.source.sha,
            check_status = ?analysis.check_status,
            title = %analysis.title,
            annotations = analysis.annotations.len(),
            "Dispatching analysis report"
        );

        self.sender.send_report(&analysis).await
    }
}

#[cfg(test)]
#[path = "translator_tests.rs"]
mod tests;
