// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use apienvelope_core::EnvelopeError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while resolving or building responses
#[derive(Error, Debug, Diagnostic)]
pub enum ResponseError {
    /// No operation registered under the requested name
    #[error("Unknown response operation: {name}")]
    #[diagnostic(
        code(apienvelope::unknown_operation),
        help("Register the operation on the ResponseBuilder at startup before calling it")
    )]
    UnknownOperation {
        #[allow(unused)]
        name: String,
    },

    /// Error from the envelope layer
    #[error(transparent)]
    #[diagnostic(transparent)]
    Envelope(#[from] EnvelopeError),
}

/// Result type for response operations
pub type Result<T> = std::result::Result<T, ResponseError>;

impl ResponseError {
    /// Create an UnknownOperation error
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }
}
