//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use metrics_relay_core::WebhookRejection;
use tracing::{debug, warn};

/// Webhook handler errors with HTTP status code mapping
///
/// Every rejection is a permanent client error and maps to
/// `400 Bad Request`. Downstream delivery failures never surface here; they
/// happen after the response has been sent.
#[derive(Debug, thiserror::Error)]
pub enum WebhookHandlerError {
    /// The request failed one of the validation checks
    #[error("{0}")]
    Rejected(#[from] WebhookRejection),
}

impl WebhookHandlerError {
    /// Stable machine-readable code of the underlying rejection
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected(rejection) => rejection.code(),
        }
    }
}

impl IntoResponse for WebhookHandlerError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let Self::Rejected(ref rejection) = self;

        if rejection.is_irrelevant_event() {
            debug!(code = rejection.code(), "Ignoring irrelevant build event");
        } else {
            warn!(code = rejection.code(), error = %rejection, "Rejecting webhook request");
        }

        let body = serde_json::json!({
            "error": {
                "kind": "BAD_REQUEST",
                "code": rejection.code(),
                "message": rejection.to_string(),
                "status": status.as_u16(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Failed to initialize metrics: {message}")]
    MetricsInit { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl From<prometheus::Error> for ServiceError {
    fn from(e: prometheus::Error) -> Self {
        Self::MetricsInit {
            message: e.to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}
