//! Config defaults applied when an environment variable is absent or unparsable.

/// Default bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// OpenRouter chat-completions endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Upstream request timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Largest accepted request body (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default tracing filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";
