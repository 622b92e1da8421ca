//! Common test utilities for metrics-relay-api integration tests
//!
//! This module provides:
//! - A recording [`ReportSender`] with configurable behaviour
//! - Helpers for building application state and routers
//! - Builders for report envelopes

use async_trait::async_trait;
use metrics_relay_api::{AppState, ServiceConfig, ServiceMetrics};
use metrics_relay_core::{
    CanonicalAnalysisReport, DeliveryError, ReportSender, ReportTranslator,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};

// ============================================================================
// Mock Report Sender
// ============================================================================

/// What the mock does after recording a report
#[derive(Clone)]
#[allow(dead_code)]
pub enum SendBehavior {
    Succeed,
    Fail(DeliveryError),
    Delay(Duration),
    Panic,
}

/// Mock report sender recording every report it is handed
#[derive(Clone)]
#[allow(dead_code)]
pub struct RecordingReportSender {
    reports: Arc<Mutex<Vec<CanonicalAnalysisReport>>>,
    behavior: Arc<Mutex<SendBehavior>>,
}

impl RecordingReportSender {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            behavior: Arc::new(Mutex::new(SendBehavior::Succeed)),
        }
    }

    #[allow(dead_code)]
    pub fn set_behavior(&self, behavior: SendBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    #[allow(dead_code)]
    pub fn reports(&self) -> Vec<CanonicalAnalysisReport> {
        self.reports.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    /// Poll until at least `expected` reports arrived or two seconds passed
    #[allow(dead_code)]
    pub async fn wait_for_calls(&self, expected: usize) -> usize {
        for _ in 0..200 {
            let count = self.call_count();
            if count >= expected {
                return count;
            }
            sleep(Duration::from_millis(10)).await;
        }
        self.call_count()
    }
}

#[async_trait]
impl ReportSender for RecordingReportSender {
    async fn send_report(&self, report: &CanonicalAnalysisReport) -> Result<(), DeliveryError> {
        self.reports.lock().unwrap().push(report.clone());

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            SendBehavior::Succeed => Ok(()),
            SendBehavior::Fail(error) => Err(error),
            SendBehavior::Delay(delay) => {
                sleep(delay).await;
                Ok(())
            }
            SendBehavior::Panic => panic!("report sender exploded"),
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

#[allow(dead_code)]
pub fn create_test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.relay.target_url = Some("http://aggregator.test".to_string());
    config
}

#[allow(dead_code)]
pub fn create_test_app_state_with_sender(sender: Arc<dyn ReportSender>) -> AppState {
    create_test_app_state_with_config(create_test_config(), sender)
}

#[allow(dead_code)]
pub fn create_test_app_state_with_config(
    config: ServiceConfig,
    sender: Arc<dyn ReportSender>,
) -> AppState {
    let translator = ReportTranslator::new(config.relay.context.clone(), sender);
    AppState::new(
        config,
        Arc::new(translator),
        ServiceMetrics::new().expect("metrics registry must build"),
    )
}

// ============================================================================
// Envelope Builders
// ============================================================================

/// Build metrics with the given overall status and test results
#[allow(dead_code)]
pub fn build_metrics(status: &str, tests: Value) -> Value {
    json!({
        "buildId": "build-42",
        "project": { "name": "demo", "group": "org.example" },
        "elapsedTime": 4200,
        "startTime": 1700000000000u64,
        "finishedTime": 1700000004200u64,
        "testCount": tests.as_array().map(|t| t.len()).unwrap_or(0),
        "result": { "status": status },
        "tests": tests,
        "tasks": [ { "description": "Compiles main Java source." } ],
        "info": {
            "javaVersion": "17",
            "detailedJavaVersion": "17.0.9+9",
            "build": { "gradle": { "version": "8.5" } }
        }
    })
}

/// A single test result entry
#[allow(dead_code)]
pub fn test_result(class: &str, method: &str, status: &str) -> Value {
    json!({
        "suiteName": "unit",
        "className": class,
        "methodName": method,
        "result": { "status": status }
    })
}

/// Full report envelope with the build payload encoded as a string
#[allow(dead_code)]
pub fn report_envelope(build: &Value) -> Value {
    json!({
        "data": {
            "report": {
                "eventName": "build_finished",
                "payload": { "build": build.to_string(), "buildId": "build-42" }
            },
            "headers": {}
        },
        "meta": {
            "source": {
                "branch": ["main"],
                "owner": "org",
                "repo": "repo",
                "sha": "0123abcd"
            }
        }
    })
}

/// Envelope of a passing build with no tests
#[allow(dead_code)]
pub fn successful_envelope() -> Value {
    report_envelope(&build_metrics("SUCCESS", json!([])))
}
