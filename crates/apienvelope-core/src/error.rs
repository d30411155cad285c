// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for envelope configuration and payload handling
#[derive(Error, Debug, Diagnostic)]
pub enum EnvelopeError {
    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    #[diagnostic(
        code(apienvelope::config_read),
        help("Check that the file exists and is readable by the current user")
    )]
    ConfigRead {
        #[allow(unused)]
        path: String,
        #[source]
        #[allow(unused)]
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for the expected schema
    #[error("Invalid configuration: {message}")]
    #[diagnostic(
        code(apienvelope::config_parse),
        help("The file must contain a `keys` section with `status`, `message` and `data` labels")
    )]
    ConfigParse {
        #[allow(unused)]
        message: String,
    },

    /// A required envelope label is empty
    #[error("Envelope label `{key}` is missing or empty")]
    #[diagnostic(
        code(apienvelope::missing_label),
        help("Set `keys.{key}` in the configuration file to a non-empty field name")
    )]
    MissingLabel {
        #[allow(unused)]
        key: String,
    },

    /// Two envelope labels resolve to the same field name
    #[error("Envelope label `{label}` is used for both `{first}` and `{second}`")]
    #[diagnostic(
        code(apienvelope::duplicate_label),
        help("Every envelope field needs its own name, otherwise one value silently replaces the other")
    )]
    DuplicateLabel {
        #[allow(unused)]
        label: String,
        #[allow(unused)]
        first: String,
        #[allow(unused)]
        second: String,
    },

    /// Environment override could not be parsed
    #[error("Invalid value for {variable}: {value}")]
    #[diagnostic(
        code(apienvelope::invalid_env_override),
        help("Boolean overrides accept true/false, 1/0, yes/no or on/off")
    )]
    InvalidEnvOverride {
        #[allow(unused)]
        variable: String,
        #[allow(unused)]
        value: String,
    },

    /// Payload could not be converted to JSON
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(apienvelope::serialization_error),
        help("Ensure the payload only contains JSON-representable values (string map keys, finite floats)")
    )]
    Serialization {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for envelope operations
pub type Result<T> = std::result::Result<T, EnvelopeError>;

impl EnvelopeError {
    /// Create a ConfigRead error
    pub fn config_read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    /// Create a ConfigParse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    /// Create a MissingLabel error
    pub fn missing_label(key: impl Into<String>) -> Self {
        Self::MissingLabel { key: key.into() }
    }

    /// Create a DuplicateLabel error
    pub fn duplicate_label(
        label: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateLabel {
            label: label.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create an InvalidEnvOverride error
    pub fn invalid_env_override(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidEnvOverride {
            variable: variable.into(),
            value: value.into(),
        }
    }

    /// Create a Serialization error
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = EnvelopeError::missing_label("status");
        assert!(matches!(err, EnvelopeError::MissingLabel { .. }));
        assert_eq!(err.to_string(), "Envelope label `status` is missing or empty");

        let err = EnvelopeError::duplicate_label("data", "data", "data_count");
        assert!(matches!(err, EnvelopeError::DuplicateLabel { .. }));
        assert!(err.to_string().contains("`data_count`"));
    }

    #[test]
    fn test_diagnostic_code() {
        let err = EnvelopeError::invalid_env_override("APIENVELOPE_STRINGIFY", "maybe");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("apienvelope::invalid_env_override"));
    }
}
