use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the HTTP backend and its configuration.
#[derive(Debug, Error)]
pub enum HttpApiError {
    #[error("Failed to read config file {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid timeout {0:?}: expected whole seconds")]
    InvalidTimeout(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// A 2xx response whose body carries an `error` field.
    #[error("Server reported an error: {0}")]
    Server(String),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}
