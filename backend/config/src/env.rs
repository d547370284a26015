//! Loading `RelayConfig` from the process environment.
//!
//! A local `.env` file is read first (development convenience); values already
//! set in the real environment take precedence over it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::schema::{RejectedEnvVar, RelayConfig};

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_BIND: &str = "CAPTIONFORGE_BIND";
pub const ENV_PORT: &str = "CAPTIONFORGE_PORT";
pub const ENV_UPSTREAM_URL: &str = "CAPTIONFORGE_UPSTREAM_URL";
pub const ENV_UPSTREAM_TIMEOUT: &str = "CAPTIONFORGE_UPSTREAM_TIMEOUT_SECS";
pub const ENV_MAX_UPLOAD: &str = "CAPTIONFORGE_MAX_UPLOAD_BYTES";
pub const ENV_LOG_LEVEL: &str = "RUST_LOG";
pub const ENV_LOG_DIR: &str = "CAPTIONFORGE_LOG_DIR";

/// Load `.env` from the working directory (or a parent) into the process env.
///
/// Returns the path that was loaded, `None` when there is no such file, or the
/// error for a file that exists but could not be read. Nothing is logged here:
/// this runs before the subscriber is installed.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    dotenv_outcome(dotenvy::dotenv())
}

fn dotenv_outcome(
    result: Result<PathBuf, dotenvy::Error>,
) -> Result<Option<PathBuf>, dotenvy::Error> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

impl RelayConfig {
    /// Build the config from the current process environment.
    pub fn from_env() -> Self {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Build the config from an explicit variable map (useful for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let defaults = RelayConfig::default();
        let mut rejected = Vec::new();

        let text = |name: &str| {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = RelayConfig {
            api_key: text(ENV_API_KEY),
            bind_address: text(ENV_BIND).unwrap_or(defaults.bind_address),
            port: parse_or(vars, ENV_PORT, defaults.port, &mut rejected),
            upstream_url: text(ENV_UPSTREAM_URL).unwrap_or(defaults.upstream_url),
            upstream_timeout_secs: parse_or(
                vars,
                ENV_UPSTREAM_TIMEOUT,
                defaults.upstream_timeout_secs,
                &mut rejected,
            ),
            max_upload_bytes: parse_or(vars, ENV_MAX_UPLOAD, defaults.max_upload_bytes, &mut rejected),
            log_level: text(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: text(ENV_LOG_DIR).map(PathBuf::from),
            rejected_env: Vec::new(),
        };

        RelayConfig { rejected_env: rejected, ..config }
    }
}

fn parse_or<T: FromStr>(
    vars: &HashMap<String, String>,
    name: &str,
    default: T,
    rejected: &mut Vec<RejectedEnvVar>,
) -> T {
    let Some(raw) = vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            rejected.push(RejectedEnvVar {
                name: name.to_string(),
                value: raw.to_string(),
            });
            default
        }
    }
}
