//! Apienvelope Core - configuration and assembly of JSON response envelopes
//!
//! This crate provides:
//! - Typed envelope configuration (labels, flags, default messages)
//! - Ordered envelope assembly with data counts and extra fragments
//! - Response kinds with their status codes
//! - Error types with miette diagnostics

pub mod config;
pub mod envelope;
pub mod error;
pub mod kind;

// Re-export commonly used types
pub use config::{ApiConfig, Labels, Messages};
pub use envelope::{fragment, Envelope, EnvelopeFormat, Fragment};
pub use error::{EnvelopeError, Result};
pub use kind::ResponseKind;

pub use serde_json::Value;

/// Payload used when a caller passes none: an empty JSON array
pub fn empty_payload() -> Value {
    Value::Array(Vec::new())
}

/// Convert typed data into a JSON payload
pub fn to_payload<T: serde::Serialize>(data: &T) -> Result<Value> {
    serde_json::to_value(data).map_err(|e| {
        EnvelopeError::serialization(
            format!("Failed to serialize payload: {}", e),
            Some(Box::new(e)),
        )
    })
}
