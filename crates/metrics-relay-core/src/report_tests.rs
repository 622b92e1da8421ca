//! Tests for the canonical report model.

use super::*;
use serde_json::json;

fn complete_source() -> SourceCoordinate {
    SourceCoordinate::new("org", "repo", "sha", vec!["master".to_string()])
}

#[test]
fn test_complete_source_has_no_missing_fields() {
    let source = complete_source();
    assert!(source.is_complete());
    assert!(source.missing_fields().is_empty());
}

#[test]
fn test_each_missing_member_is_reported() {
    let mut source = complete_source();
    source.owner.clear();
    assert_eq!(source.missing_fields(), vec!["owner"]);

    let mut source = complete_source();
    source.repo.clear();
    assert_eq!(source.missing_fields(), vec!["repo"]);

    let mut source = complete_source();
    source.sha.clear();
    assert_eq!(source.missing_fields(), vec!["sha"]);

    let mut source = complete_source();
    source.branch.clear();
    assert_eq!(source.missing_fields(), vec!["branch"]);
}

#[test]
fn test_branch_list_of_empty_names_is_incomplete() {
    let source = SourceCoordinate::new("org", "repo", "sha", vec![String::new()]);
    assert!(!source.is_complete());

    let source = SourceCoordinate::new(
        "org",
        "repo",
        "sha",
        vec![String::new(), "feature/x".to_string()],
    );
    assert!(source.is_complete());
}

#[test]
fn test_check_status_passes_only_on_success() {
    assert_eq!(
        CheckStatus::from_build_status(Some(ResultValue::Success)),
        CheckStatus::Passed
    );

    for status in [
        Some(ResultValue::Failure),
        Some(ResultValue::Skipped),
        Some(ResultValue::Unknown),
        Some(ResultValue::Unrecognized),
        None,
    ] {
        assert_eq!(
            CheckStatus::from_build_status(status),
            CheckStatus::Blocked,
            "status {:?} must block",
            status
        );
    }
}

#[test]
fn test_report_serializes_in_platform_shape() {
    let report = CanonicalAnalysisReport {
        sender: "gradle-metrics".to_string(),
        source: complete_source(),
        check_status: CheckStatus::Blocked,
        title: "1 Tests, 1 failed".to_string(),
        uuid: "12345678-1234-1234-1234-123456789abc".parse().unwrap(),
        metadata: json!({ "project": "demo" }),
        annotations: vec![Annotation {
            title: "Failed Test: A b".to_string(),
            detail: "suite A b".to_string(),
            severity: Severity::Blocker,
        }],
    };

    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(
        value,
        json!({
            "sender": "gradle-metrics",
            "source": { "owner": "org", "repo": "repo", "sha": "sha", "branch": ["master"] },
            "checkStatus": "BLOCKED",
            "title": "1 Tests, 1 failed",
            "uuid": "12345678-1234-1234-1234-123456789abc",
            "metadata": { "project": "demo" },
            "annotations": [
                { "title": "Failed Test: A b", "detail": "suite A b", "severity": "BLOCKER" }
            ]
        })
    );
}
