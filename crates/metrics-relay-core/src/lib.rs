//! # Metrics Relay Core
//!
//! Domain logic for relaying Gradle build-metrics reports to the CI-status
//! aggregation platform.
//!
//! This crate contains the webhook validation pipeline that turns an inbound
//! report envelope into a validated [`BuildReport`] plus [`SourceCoordinate`],
//! and the [`ReportTranslator`] that turns those into the platform's
//! [`CanonicalAnalysisReport`].
//!
//! ## Architecture
//!
//! - Validation and translation are plain synchronous functions
//! - Delivery of the translated report goes through the [`ReportSender`] trait
//! - Infrastructure implementations live in [`adapters`] and are injected at runtime
//!
//! ## Usage
//!
//! ```rust
//! use metrics_relay_core::webhook::validate_request;
//!
//! let body = br#"{"meta":{}}"#;
//! let rejection = validate_request(body).unwrap_err();
//! assert_eq!(rejection.code(), "unparsable_build_payload");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use uuid::Uuid;

// ============================================================================
// Identifier Types
// ============================================================================

/// Identifier correlating an inbound webhook with the report it produced.
///
/// Serialized as the report `uuid` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate new correlation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get string representation
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CorrelationId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = s.parse::<Uuid>().map_err(|_| ParseError::InvalidFormat {
            expected: "UUID format".to_string(),
            actual: s.to_string(),
        })?;
        Ok(Self(uuid))
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error type for string parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid format: expected {expected}, got '{actual}'")]
    InvalidFormat { expected: String, actual: String },
}

// ============================================================================
// Module declarations
// ============================================================================

/// Vendor model emitted by the Gradle build-metrics agent
pub mod metrics;

/// Canonical report model shared with the aggregation platform
pub mod report;

/// Inbound webhook envelope decoding and validation
pub mod webhook;

/// Translation of build reports into canonical analysis reports
pub mod translator;

/// Outbound delivery abstraction
pub mod delivery;

/// Infrastructure implementations of core traits
pub mod adapters;

// Re-export key types for convenience
pub use adapters::HttpReportSender;
pub use delivery::{DeliveryError, ReportSender};
pub use metrics::{BuildInfo, BuildMetrics, BuildReport, ResultValue, TaskInfo, TestResult};
pub use report::{Annotation, CanonicalAnalysisReport, CheckStatus, Severity, SourceCoordinate};
pub use translator::{ReportTranslator, ResultCount};
pub use webhook::{AcceptedReport, WebhookRejection};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
