//! Runtime configuration for the caption relay.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::{
    DEFAULT_BIND_ADDRESS, DEFAULT_LOG_LEVEL, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
    DEFAULT_UPSTREAM_TIMEOUT_SECS, DEFAULT_UPSTREAM_URL,
};

/// Relay configuration, built once at startup and handed to the components
/// that need it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Bearer credential for the upstream API
    pub api_key: Option<String>,
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Chat-completions endpoint
    pub upstream_url: String,
    /// Upstream request timeout, seconds
    pub upstream_timeout_secs: u64,
    /// Largest accepted request body, bytes
    pub max_upload_bytes: usize,
    /// Tracing filter directive
    pub log_level: String,
    /// Directory for rolling NDJSON log files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Environment values that were present but could not be parsed.
    #[serde(skip)]
    pub rejected_env: Vec<RejectedEnvVar>,
}

/// An env var whose value was ignored in favour of the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEnvVar {
    pub name: String,
    pub value: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
            rejected_env: Vec::new(),
        }
    }
}

impl RelayConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// `bind:port`, suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
