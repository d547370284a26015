//! `captionforge-config` — runtime configuration for the caption relay.
//!
//! Provides:
//! - Typed `RelayConfig` read from the process environment
//! - `.env` loading for local development
//! - Default values
//! - Validation with errors and warnings
//! - Redacted snapshots for safe display

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::load_dotenv;
pub use redact::{mask_secret, redact};
pub use schema::{RejectedEnvVar, RelayConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

/// Log every finding of a validation report.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}
