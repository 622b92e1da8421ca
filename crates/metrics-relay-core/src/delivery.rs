//! # Report Delivery
//!
//! Abstraction over the client that ships canonical reports to the
//! aggregation service.

use crate::report::CanonicalAnalysisReport;
use async_trait::async_trait;

/// Outbound client delivering analysis reports
///
/// Implementations must be safe to share across concurrent requests.
/// Retry and timeout policy, if any, belong to the implementation.
#[async_trait]
pub trait ReportSender: Send + Sync {
    /// Deliver a single report
    async fn send_report(&self, report: &CanonicalAnalysisReport) -> Result<(), DeliveryError>;
}

/// Errors raised while delivering a report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The configured target cannot produce a report endpoint
    #[error("Invalid report endpoint '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },

    /// The request could not be built
    #[error("Failed to build report request: {message}")]
    Request { message: String },

    /// Network connectivity or transport failure
    #[error("Transport error while sending report: {message}")]
    Transport { message: String },

    /// The aggregation service answered with a non-success status
    #[error("Report rejected by aggregation service: {status} - {message}")]
    Rejected { status: u16, message: String },
}

impl DeliveryError {
    /// Check if a later attempt could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::InvalidEndpoint { .. } => false,
            Self::Request { .. } => false,
            Self::Transport { .. } => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
