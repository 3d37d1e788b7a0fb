use std::path::PathBuf;

/// Unified error type for the minical crate.
///
/// Failures at the holiday-pipeline boundary are recorded and logged,
/// never fatal; the variants carry enough context (status code, path,
/// underlying cause) to render a human-readable message.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("holiday API key is not configured")]
    MissingApiKey,

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{context} {path}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CalendarError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CalendarError::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`CalendarError`].
pub type Result<T> = std::result::Result<T, CalendarError>;
