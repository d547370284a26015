//! Config redaction: produce safe-to-print config snapshots by masking secrets.

use serde_json::Value;

use crate::schema::RelayConfig;

/// Keys whose string values are secrets.
static SENSITIVE_KEYS: &[&str] = &["apiKey", "api_key", "token", "secret", "password"];

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Mask a secret, keeping the first 4 chars as a hint.
pub fn mask_secret(secret: &str) -> String {
    match secret.char_indices().nth(4) {
        Some((cut, _)) => format!("{}***", &secret[..cut]),
        None => "***".to_string(),
    }
}

/// Redact a JSON value, replacing every sensitive string field.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let redacted = match v {
                        Value::String(s) if is_sensitive_key(k) && !s.is_empty() => {
                            Value::String(mask_secret(s))
                        }
                        other => redact(other),
                    };
                    (k.clone(), redacted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

impl RelayConfig {
    /// JSON snapshot of the config with secrets masked.
    pub fn redacted(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => redact(&value),
            Err(e) => Value::String(format!("<unserializable config: {e}>")),
        }
    }
}
