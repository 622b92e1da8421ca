//! # Metrics Relay Service
//!
//! Binary entry point for the metrics relay HTTP service.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging and the panic hook
//! - Creates the outbound report sender and the translator
//! - Starts the HTTP server from metrics-relay-api

mod settings;
mod telemetry;

use metrics_relay_api::{start_server, ConfigError, ServiceError};
use metrics_relay_core::{HttpReportSender, ReportTranslator};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Logging is configured from the loaded settings, so configuration errors
    // are reported on stderr.
    let service_config = match settings::load_service_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(3);
        }
    };

    telemetry::init_logging(&service_config.logging);
    telemetry::install_panic_hook();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting metrics relay service");

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    // -------------------------------------------------------------------------
    // Wire collaborators
    // -------------------------------------------------------------------------
    let sender = match service_config
        .relay
        .target_url()
        .map_err(ServiceError::from)
        .and_then(|target| {
            HttpReportSender::new(&target, service_config.relay.request_timeout()).map_err(|e| {
                ServiceError::Configuration(ConfigError::Invalid {
                    message: e.to_string(),
                })
            })
        }) {
        Ok(sender) => sender,
        Err(e) => {
            error!(error = %e, "Failed to create report sender; aborting");
            std::process::exit(3);
        }
    };

    info!(
        endpoint = %sender.endpoint(),
        context = %service_config.relay.context,
        "Reports will be relayed to the aggregation service"
    );

    let translator = Arc::new(ReportTranslator::new(
        service_config.relay.context.clone(),
        Arc::new(sender),
    ));

    if let Err(e) = start_server(service_config, translator).await {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } | ServiceError::MetricsInit { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }
}
