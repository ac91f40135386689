use std::{path::Path, time::Duration};

use serde::Deserialize;
use tracing::{debug, info};

use crate::HttpApiError;

pub const ENV_URL: &str = "FORM_ANSWER_API_URL";
pub const ENV_TOKEN: &str = "FORM_ANSWER_API_TOKEN";
pub const ENV_TIMEOUT: &str = "FORM_ANSWER_API_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Where the answer service lives and how to talk to it.
///
/// ```toml
/// base_url = "https://forms.example.com/api"
/// token = "..."
/// timeout_secs = 10
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as a bearer token when present.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, HttpApiError> {
        Ok(toml::from_str(source)?)
    }

    /// Read the TOML file at `path`, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HttpApiError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| HttpApiError::ReadConfig {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?.apply_overrides(|key| std::env::var(key).ok())?;
        info!(path = %path.display(), base_url = %config.base_url, "Loaded API config");
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a config file.
    pub fn from_env() -> Result<Self, HttpApiError> {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    /// Replace fields with the values `lookup` finds for the `FORM_ANSWER_API_*` keys.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HttpApiError> {
        if let Some(url) = lookup(ENV_URL) {
            debug!(key = ENV_URL, "Overriding base_url");
            self.base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            debug!(key = ENV_TOKEN, "Overriding token");
            self.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            self.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| HttpApiError::InvalidTimeout(raw.clone()))?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
