//! Configuration loading and management

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default mock API hosting the catalog
pub const DEFAULT_BASE_URL: &str = "https://6852821e0594059b23cdd834.mockapi.io";

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },
}

/// Settings of the FoodWagen client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the remote API (no trailing resource path)
    pub base_url: String,

    /// Collection path under the base URL
    pub resource: String,

    /// How long a fetched list is served from cache
    pub stale_time_secs: u64,

    /// Request timeout; `None` keeps the transport default (no timeout)
    pub request_timeout_secs: Option<u64>,

    /// Maximum characters kept in free-text fields before sending
    pub max_text_length: usize,

    /// Maximum characters kept in URL fields before sending
    pub max_url_length: usize,

    /// Buffer size of the cache event bus
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource: "Food".to_string(),
            stale_time_secs: 60,
            request_timeout_secs: None,
            max_text_length: 100,
            max_url_length: 2048,
            event_capacity: 256,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    ///
    /// Missing keys take their default value.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FOODWAGEN_*` environment overrides
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source
    ///
    /// Recognized keys: `FOODWAGEN_BASE_URL`, `FOODWAGEN_STALE_SECS`,
    /// `FOODWAGEN_TIMEOUT_SECS`.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("FOODWAGEN_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(secs) = lookup("FOODWAGEN_STALE_SECS") {
            self.stale_time_secs = parse_secs("stale_time_secs", &secs)?;
        }
        if let Some(secs) = lookup("FOODWAGEN_TIMEOUT_SECS") {
            self.request_timeout_secs = Some(parse_secs("request_timeout_secs", &secs)?);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the configuration can be used to build a client
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            value: self.base_url.clone(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                message: "scheme must be http or https".to_string(),
            });
        }
        if self.resource.trim_matches('/').is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "resource".to_string(),
                value: self.resource.clone(),
                message: "resource path must not be empty".to_string(),
            });
        }
        if self.max_text_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_text_length".to_string(),
                value: self.max_text_length.to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// URL of the collection, e.g. `https://host/Food`
    pub fn collection_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            value: self.base_url.clone(),
            message: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                message: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(self.resource.trim_matches('/'));
        Ok(url)
    }

    /// URL of one record, the id being percent-encoded as a path segment
    pub fn record_url(&self, id: &str) -> Result<Url, ConfigError> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                message: "URL cannot be a base".to_string(),
            })?
            .push(id);
        Ok(url)
    }
}

fn parse_secs(field: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
}
