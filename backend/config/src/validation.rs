//! Config validation: checks with user-friendly error messages.

use crate::schema::RelayConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &RelayConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_credentials(config, &mut report);
    validate_server(config, &mut report);
    validate_upstream(config, &mut report);
    validate_env(config, &mut report);
    report
}

/// A missing key is not fatal: requests fail upstream with an auth error instead.
fn validate_credentials(config: &RelayConfig, report: &mut ValidationReport) {
    if config.api_key.is_none() {
        report.warn(
            "apiKey",
            "OPENROUTER_API_KEY is not set; upstream calls will be rejected",
        );
    }
}

fn validate_server(config: &RelayConfig, report: &mut ValidationReport) {
    if config.port == 0 {
        report.error("port", "Port must be > 0");
    } else if config.port < 1024 && config.port != 80 && config.port != 443 {
        report.warn(
            "port",
            format!(
                "Port {} requires elevated privileges; consider using a port >= 1024",
                config.port
            ),
        );
    }
    if config.max_upload_bytes == 0 {
        report.error("maxUploadBytes", "maxUploadBytes must be > 0");
    }
}

fn validate_upstream(config: &RelayConfig, report: &mut ValidationReport) {
    let url = config.upstream_url.as_str();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        report.error(
            "upstreamUrl",
            format!("Upstream URL must be http(s), got '{url}'"),
        );
    } else if url.starts_with("http://") {
        report.warn("upstreamUrl", "Upstream URL is not HTTPS; the API key is sent in clear text");
    }
    if config.upstream_timeout_secs == 0 {
        report.error("upstreamTimeoutSecs", "upstreamTimeoutSecs must be > 0");
    }
}

fn validate_env(config: &RelayConfig, report: &mut ValidationReport) {
    for rejected in &config.rejected_env {
        report.warn(
            rejected.name.clone(),
            format!("Ignoring unparsable value '{}'; using the default", rejected.value),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RejectedEnvVar;

    fn keyed() -> RelayConfig {
        RelayConfig {
            api_key: Some("sk-or-test".into()),
            ..RelayConfig::default()
        }
    }

    #[test]
    fn defaults_with_key_are_clean() {
        let report = validate(&keyed());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_key_is_only_a_warning() {
        let report = validate(&RelayConfig::default());
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "apiKey");
    }

    #[test]
    fn zero_limits_are_errors() {
        let config = RelayConfig {
            port: 0,
            upstream_timeout_secs: 0,
            max_upload_bytes: 0,
            ..keyed()
        };
        let report = validate(&config);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn rejects_non_http_upstream() {
        let config = RelayConfig {
            upstream_url: "ftp://example.com".into(),
            ..keyed()
        };
        let report = validate(&config);
        assert!(!report.is_valid());
        assert!(report.errors[0].to_string().contains("upstreamUrl"));
    }

    #[test]
    fn rejected_env_surfaces_as_warning() {
        let config = RelayConfig {
            rejected_env: vec![RejectedEnvVar {
                name: "CAPTIONFORGE_PORT".into(),
                value: "x".into(),
            }],
            ..keyed()
        };
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings[0].path, "CAPTIONFORGE_PORT");
    }
}
