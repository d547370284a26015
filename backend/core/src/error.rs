use thiserror::Error;

/// Top-level error type for the caption relay.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream returned a non-JSON body: {0}")]
    Decode(String),

    #[error("upstream completion is missing choices[0].message.content")]
    MalformedCompletion,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Render an error together with its `source()` chain, outermost first.
///
/// `reqwest` keeps the interesting part (connection refused, timed out) in the
/// source chain, so `to_string()` alone loses it.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !rendered.contains(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}
