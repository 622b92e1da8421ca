//! Layered configuration loading for the relay service.

use anyhow::Context;
use metrics_relay_api::ServiceConfig;
use tracing::info;

/// Prefix of environment variables overriding configuration values
pub const ENV_PREFIX: &str = "MR";

/// Environment variable naming an explicit configuration file
pub const CONFIG_FILE_VAR: &str = "MR_CONFIG_FILE";

/// Load the service configuration
///
/// Sources, later ones overriding earlier ones:
///  1. `/etc/metrics-relay/service.yaml`
///  2. `./config/service.yaml`
///  3. the file named by `MR_CONFIG_FILE`, which must exist when set
///  4. environment variables prefixed `MR__`, e.g. `MR__RELAY__TARGET_URL`
///
/// Absent optional files are skipped. The result is not validated.
pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let mut builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/metrics-relay/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    if let Ok(explicit_path) = std::env::var(CONFIG_FILE_VAR) {
        if !explicit_path.is_empty() {
            info!(path = %explicit_path, "Loading configuration from explicit path");
            builder = builder.add_source(
                config::File::with_name(&explicit_path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
        }
    }

    builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context("Failed to build configuration")?
        .try_deserialize::<ServiceConfig>()
        .context("Could not deserialize service configuration")
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
