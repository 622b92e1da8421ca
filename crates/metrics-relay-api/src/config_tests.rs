//! Tests for [`ServiceConfig`] and its validation rules.

use super::*;

fn valid_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.relay.target_url = Some("https://ci.example.com".to_string());
    config
}

fn assert_invalid(config: &ServiceConfig, fragment: &str) {
    match config.validate() {
        Err(ConfigError::Invalid { message }) => assert!(
            message.contains(fragment),
            "expected message about {fragment}, got: {message}"
        ),
        other => panic!("expected Invalid error about {fragment}, got: {:?}", other),
    }
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_defaults() {
    let config = ServiceConfig::default();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.max_body_size, 10 * 1024 * 1024);
    assert_eq!(config.relay.context, "gradle-metrics");
    assert_eq!(config.relay.endpoint_path, "/report");
    assert!(config.relay.target_url.is_none());
    assert!(!config.relay.log_webhook_events);
    assert_eq!(config.relay.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.logging.level, "info");
}

/// A source that names only the target URL must fill everything else with
/// defaults.
#[test]
fn test_partial_source_deserializes_with_defaults() {
    let config: ServiceConfig = serde_json::from_str(
        r#"{ "relay": { "target_url": "http://aggregator:9000" }, "server": { "port": 9090 } }"#,
    )
    .expect("partial config must deserialize");

    assert_eq!(config.server.port, 9090);
    assert!(config.server.enable_cors);
    assert_eq!(config.relay.context, "gradle-metrics");
    assert_eq!(
        config.relay.target_url.as_deref(),
        Some("http://aggregator:9000")
    );
    assert!(config.validate().is_ok());
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_valid_config_passes() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_missing_target_url_fails() {
    let config = ServiceConfig::default();

    match config.validate() {
        Err(ConfigError::Missing { key }) => assert_eq!(key, "relay.target_url"),
        other => panic!("expected Missing error, got: {:?}", other),
    }
}

#[test]
fn test_blank_target_url_counts_as_missing() {
    let mut config = valid_config();
    config.relay.target_url = Some("   ".to_string());

    assert!(matches!(
        config.validate(),
        Err(ConfigError::Missing { .. })
    ));
}

#[test]
fn test_unparsable_target_url_fails() {
    let mut config = valid_config();
    config.relay.target_url = Some("not a url".to_string());

    assert_invalid(&config, "not a valid URL");
}

#[test]
fn test_non_http_target_url_fails() {
    let mut config = valid_config();
    config.relay.target_url = Some("ftp://ci.example.com".to_string());

    assert_invalid(&config, "http or https");
}

#[test]
fn test_empty_context_fails() {
    let mut config = valid_config();
    config.relay.context = " ".to_string();

    assert_invalid(&config, "relay.context");
}

#[test]
fn test_relative_endpoint_path_fails() {
    let mut config = valid_config();
    config.relay.endpoint_path = "report".to_string();

    assert_invalid(&config, "relay.endpoint_path");
}

#[test]
fn test_zero_values_fail() {
    let mut config = valid_config();
    config.server.port = 0;
    assert_invalid(&config, "server.port");

    let mut config = valid_config();
    config.server.max_body_size = 0;
    assert_invalid(&config, "server.max_body_size");

    let mut config = valid_config();
    config.relay.request_timeout_seconds = 0;
    assert_invalid(&config, "relay.request_timeout_seconds");
}

#[test]
fn test_target_url_is_parsed() {
    let url = valid_config().relay.target_url().unwrap();
    assert_eq!(url.host_str(), Some("ci.example.com"));
}
