//! # HTTP Report Sender
//!
//! Delivers canonical analysis reports to the aggregation service with a
//! single JSON `POST` to `<target>/report`.

use crate::delivery::{DeliveryError, ReportSender};
use crate::report::CanonicalAnalysisReport;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const REPORT_PATH: &str = "report";

/// Report sender backed by a shared `reqwest` client
///
/// Makes exactly one attempt per report. A failed attempt is returned to the
/// caller and never retried.
#[derive(Debug, Clone)]
pub struct HttpReportSender {
    http_client: HttpClient,
    endpoint: Url,
}

impl HttpReportSender {
    /// Create new sender
    ///
    /// # Arguments
    ///
    /// * `target` - Base URL of the aggregation service
    /// * `timeout` - Total timeout applied to each delivery request
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidEndpoint`] if `target` cannot carry a
    /// path, and [`DeliveryError::Request`] if the client cannot be built.
    pub fn new(target: &Url, timeout: Duration) -> Result<Self, DeliveryError> {
        let endpoint = report_endpoint(target)?;

        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!("metrics-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeliveryError::Request {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Full URL reports are posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Resolve `<target>/report`, keeping any path prefix of the target
fn report_endpoint(target: &Url) -> Result<Url, DeliveryError> {
    if target.cannot_be_a_base() || !matches!(target.scheme(), "http" | "https") {
        return Err(DeliveryError::InvalidEndpoint {
            url: target.to_string(),
            message: "target must be an absolute http(s) URL".to_string(),
        });
    }

    let mut base = target.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(REPORT_PATH)
        .map_err(|e| DeliveryError::InvalidEndpoint {
            url: target.to_string(),
            message: e.to_string(),
        })
}

#[async_trait]
impl ReportSender for HttpReportSender {
    #[instrument(skip_all, fields(uuid = %report.uuid, endpoint = %self.endpoint))]
    async fn send_report(&self, report: &CanonicalAnalysisReport) -> Result<(), DeliveryError> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(report)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    DeliveryError::Request {
                        message: e.to_string(),
                    }
                } else {
                    DeliveryError::Transport {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), "Report accepted by aggregation service");
        Ok(())
    }
}

#[cfg(test)]
#[path = "http_report_sender_tests.rs"]
mod tests;
