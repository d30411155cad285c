//! Envelope configuration.
//!
//! Labels and default messages are loaded once at startup and never change
//! afterwards. Loading happens in three layers, later layers winning:
//! 1. Built-in defaults
//! 2. A YAML file
//! 3. `APIENVELOPE_*` environment variables
//!
//! The result is validated before it is handed out, so a builder never sees an
//! empty or colliding label.

use crate::{EnvelopeError, ResponseKind, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "APIENVELOPE_";

/// Default label for the element count field
pub const DEFAULT_DATA_COUNT_LABEL: &str = "DATA_COUNT";

/// Field names used inside the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// Label for the status field
    pub status: String,

    /// Label for the message field
    pub message: String,

    /// Label for the payload field
    pub data: String,

    /// Label for the element count field
    #[serde(default = "default_data_count")]
    pub data_count: String,
}

fn default_data_count() -> String {
    DEFAULT_DATA_COUNT_LABEL.to_string()
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            status: "status".to_string(),
            message: "message".to_string(),
            data: "data".to_string(),
            data_count: default_data_count(),
        }
    }
}

/// Fallback messages used when a caller passes no message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub success: String,
    pub notfound: String,
    pub validation: String,
    pub forbidden: String,
    pub error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            success: "Success".to_string(),
            notfound: "Sorry, no results match your request".to_string(),
            validation: "Validation failed, please check the request attributes and try again"
                .to_string(),
            forbidden: "You don't have permission to access this content".to_string(),
            error: "Server error, please try again later".to_string(),
        }
    }
}

impl Messages {
    /// Default message for a response kind
    pub fn for_kind(&self, kind: ResponseKind) -> &str {
        match kind {
            ResponseKind::Success => &self.success,
            ResponseKind::NotFound => &self.notfound,
            ResponseKind::Validation => &self.validation,
            ResponseKind::Forbidden => &self.forbidden,
            ResponseKind::Error => &self.error,
        }
    }
}

/// Envelope configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Envelope field names. The `keys` section is required in files.
    pub keys: Labels,

    /// Emit the status as a decimal string instead of a number
    #[serde(default)]
    pub stringify: bool,

    /// Use the envelope status as the HTTP status
    #[serde(default)]
    pub match_status: bool,

    /// Add an element count for non-empty array and map payloads
    #[serde(default)]
    pub include_data_count: bool,

    /// Fallback messages per response kind
    #[serde(default)]
    pub messages: Messages,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            keys: Labels::default(),
            stringify: false,
            match_status: false,
            include_data_count: false,
            messages: Messages::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from a YAML file, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EnvelopeError::config_read(path.display().to_string(), e))?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;

        info!(
            "Loaded envelope configuration from {} (stringify={}, match_status={}, include_data_count={})",
            path.display(),
            config.stringify,
            config.match_status,
            config.include_data_count
        );

        Ok(config)
    }

    /// Built-in defaults with environment overrides applied, validated
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML without applying overrides
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| EnvelopeError::config_parse(e.to_string()))
    }

    /// Apply `APIENVELOPE_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Supported variables (without the prefix): `STRINGIFY`, `MATCH_STATUS`,
    /// `INCLUDE_DATA_COUNT`, `KEY_STATUS`, `KEY_MESSAGE`, `KEY_DATA`, `KEY_DATA_COUNT`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            let name = format!("{}{}", ENV_PREFIX, suffix);
            lookup(&name).map(|value| (name, value))
        };

        if let Some((name, value)) = var("STRINGIFY") {
            self.stringify = parse_bool(&name, &value)?;
        }
        if let Some((name, value)) = var("MATCH_STATUS") {
            self.match_status = parse_bool(&name, &value)?;
        }
        if let Some((name, value)) = var("INCLUDE_DATA_COUNT") {
            self.include_data_count = parse_bool(&name, &value)?;
        }
        if let Some((_, value)) = var("KEY_STATUS") {
            self.keys.status = value;
        }
        if let Some((_, value)) = var("KEY_MESSAGE") {
            self.keys.message = value;
        }
        if let Some((_, value)) = var("KEY_DATA") {
            self.keys.data = value;
        }
        if let Some((_, value)) = var("KEY_DATA_COUNT") {
            self.keys.data_count = value;
        }

        Ok(())
    }

    /// Reject empty labels and labels that collide with each other
    pub fn validate(&self) -> Result<()> {
        let labels = [
            ("status", &self.keys.status),
            ("message", &self.keys.message),
            ("data", &self.keys.data),
            ("data_count", &self.keys.data_count),
        ];

        for (key, label) in &labels {
            if label.trim().is_empty() {
                return Err(EnvelopeError::missing_label(*key));
            }
        }

        for (i, (first, label)) in labels.iter().enumerate() {
            if let Some((second, _)) = labels[i + 1..].iter().find(|(_, other)| other == label) {
                return Err(EnvelopeError::duplicate_label(
                    label.as_str(),
                    *first,
                    *second,
                ));
            }
        }

        debug!("Envelope labels validated: {:?}", self.keys);
        Ok(())
    }
}

fn parse_bool(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EnvelopeError::invalid_env_override(variable, value)),
    }
}
