//! Tests for layered configuration loading

use super::*;
use serial_test::serial;

fn clear_relay_env() {
    for key in [
        CONFIG_FILE_VAR,
        "MR__RELAY__TARGET_URL",
        "MR__RELAY__CONTEXT",
        "MR__SERVER__PORT",
        "MR__LOGGING__JSON_FORMAT",
    ] {
        std::env::remove_var(key);
    }
}

/// Verify that an unconfigured environment yields the built-in defaults.
#[test]
#[serial]
fn test_defaults_without_sources() {
    // Arrange
    clear_relay_env();

    // Act
    let config = load_service_config().expect("defaults must load");

    // Assert
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.relay.context, "gradle-metrics");
    assert!(config.relay.target_url.is_none());
    assert!(config.validate().is_err(), "target URL is still required");
}

/// Verify that prefixed environment variables override nested values.
#[test]
#[serial]
fn test_environment_overrides() {
    // Arrange
    clear_relay_env();
    std::env::set_var("MR__RELAY__TARGET_URL", "https://ci.example.com");
    std::env::set_var("MR__RELAY__CONTEXT", "nightly-metrics");
    std::env::set_var("MR__SERVER__PORT", "9090");
    std::env::set_var("MR__LOGGING__JSON_FORMAT", "true");

    // Act
    let result = load_service_config();

    // Cleanup
    clear_relay_env();

    // Assert
    let config = result.expect("environment overrides must load");
    assert_eq!(
        config.relay.target_url.as_deref(),
        Some("https://ci.example.com")
    );
    assert_eq!(config.relay.context, "nightly-metrics");
    assert_eq!(config.server.port, 9090);
    assert!(config.logging.json_format);
    assert!(config.validate().is_ok());
}

/// Verify that a named configuration file must exist.
#[test]
#[serial]
fn test_missing_explicit_file_fails() {
    // Arrange
    clear_relay_env();
    std::env::set_var(CONFIG_FILE_VAR, "/nonexistent/metrics-relay/service.yaml");

    // Act
    let result = load_service_config();

    // Cleanup
    clear_relay_env();

    // Assert
    assert!(result.is_err(), "a missing explicit file must be an error");
}

/// Verify that a value of the wrong type is a hard error.
#[test]
#[serial]
fn test_uncoercible_value_fails() {
    // Arrange
    clear_relay_env();
    std::env::set_var("MR__SERVER__PORT", "eighty");

    // Act
    let result = load_service_config();

    // Cleanup
    clear_relay_env();

    // Assert
    assert!(result.is_err(), "a non-numeric port must not deserialize");
}
