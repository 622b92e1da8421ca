//! # Metrics Relay HTTP Service
//!
//! HTTP server receiving Gradle build-metrics webhooks from the platform gate
//! and relaying them to the CI-status aggregation service.
//!
//! This service provides:
//! - The webhook endpoint, answering `204` on acceptance and `400` on rejection
//! - Fire-and-forget dispatch of translated reports
//! - Health and Prometheus metrics endpoints

pub mod config;
pub mod errors;
pub mod metrics;

pub use config::{LoggingConfig, RelayConfig, ServerConfig, ServiceConfig};
pub use errors::{ConfigError, ServiceError, WebhookHandlerError};
pub use metrics::ServiceMetrics;

use axum::{
    extract::{DefaultBodyLimit, Extension, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use metrics_relay_core::{webhook::validate_request, CorrelationId, ReportTranslator};
use serde::Serialize;
use std::{future::IntoFuture, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, instrument, warn, Instrument};

/// Header carrying the request correlation ID
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: ServiceConfig,

    /// Translator turning accepted webhooks into analysis reports
    pub translator: Arc<ReportTranslator>,

    /// Metrics collector for observability
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: ServiceConfig,
        translator: Arc<ReportTranslator>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            config,
            translator,
            metrics,
        }
    }
}

// ============================================================================
// Router and Server
// ============================================================================

/// Create the HTTP router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;

    let webhook_routes = Router::new()
        .route(&state.config.relay.endpoint_path, post(handle_webhook))
        .layer(DefaultBodyLimit::max(server.max_body_size));

    let observability_routes = Router::new()
        .route("/health", get(handle_health_check))
        .route("/metrics", get(metrics_endpoint));

    let mut router = Router::new()
        .merge(webhook_routes)
        .merge(observability_routes);

    if server.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    if server.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
///
/// Serves until SIGINT or SIGTERM, then waits up to
/// `server.shutdown_timeout_seconds` for in-flight requests.
pub async fn start_server(
    config: ServiceConfig,
    translator: Arc<ReportTranslator>,
) -> Result<(), ServiceError> {
    let metrics = ServiceMetrics::new()?;

    let state = AppState::new(config.clone(), translator, metrics);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: addr.clone(),
                message: e.to_string(),
            })?;

    info!(
        address = %addr,
        endpoint = %config.relay.endpoint_path,
        "Starting HTTP server"
    );

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    let shutdown_started = Arc::new(tokio::sync::Notify::new());

    let server = axum::serve(listener, app).with_graceful_shutdown({
        let shutdown_started = shutdown_started.clone();
        async move {
            shutdown_signal().await;
            info!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Initiating graceful shutdown"
            );
            shutdown_started.notify_one();
        }
    });

    let drain_deadline = async {
        shutdown_started.notified().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            })?;
        }
        _ = drain_deadline => {
            warn!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "In-flight requests did not finish before the shutdown timeout"
            );
        }
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C)"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

// ============================================================================
// Webhook Handler
// ============================================================================

/// Handle a build-metrics report webhook
///
/// Validation happens inline and decides the response. An accepted report is
/// translated and delivered in a detached task; the caller receives `204`
/// without waiting for, or ever learning about, the delivery outcome.
#[instrument(skip_all, fields(correlation_id = %correlation_id))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
    body: Bytes,
) -> Result<StatusCode, WebhookHandlerError> {
    state.metrics.record_webhook_request();

    if state.config.relay.log_webhook_events {
        debug!(body = %String::from_utf8_lossy(&body), "Received webhook event");
    }

    let accepted = validate_request(&body).map_err(|rejection| {
        state.metrics.record_rejection(rejection.code());
        WebhookHandlerError::from(rejection)
    })?;

    info!(
        owner = %accepted.source.owner,
        repo = %accepted.source.repo,
        sha = %accepted.source.sha,
        "Accepted build report"
    );

    let translator = state.translator.clone();
    let metrics = state.metrics.clone();
    metrics.record_dispatch();

    tokio::spawn(
        async move {
            if let Err(e) = translator
                .send_report(&accepted.report, &accepted.source, correlation_id)
                .await
            {
                metrics.record_delivery_failure();
                error!(
                    error = %e,
                    transient = e.is_transient(),
                    "Failed to deliver analysis report"
                );
            }
        }
        .in_current_span(),
    );

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Observability Handlers
// ============================================================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Liveness check
async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Prometheus metrics endpoint
#[instrument(skip_all)]
async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.encode().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware with correlation ID tracking
///
/// Reuses the caller's `x-correlation-id` when it is a valid UUID, otherwise
/// generates one. The ID is stored in the request extensions for handlers
/// and echoed in the response headers.
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<CorrelationId>().ok())
        .unwrap_or_default();

    tracing::Span::current().record("correlation_id", correlation_id.as_str().as_str());
    request.extensions_mut().insert(correlation_id);

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = HeaderValue::from_str(&correlation_id.as_str()) {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }

    let status = response.status();

    if status.is_server_error() {
        error!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
