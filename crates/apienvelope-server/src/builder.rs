use crate::registry::{OperationArgs, OperationRegistry};
use crate::{ApiResponse, ResponseError, Result};
use apienvelope_core::{
    empty_payload, ApiConfig, EnvelopeError, EnvelopeFormat, Fragment, Messages, ResponseKind,
    Value,
};
use axum::http::StatusCode;
use tracing::{debug, warn};

/// Builds enveloped JSON responses from a validated configuration.
///
/// A builder is immutable once shared; register named operations before
/// wrapping it in an `Arc`.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    format: EnvelopeFormat,
    match_status: bool,
    messages: Messages,
    operations: OperationRegistry,
}

impl ResponseBuilder {
    /// Create a builder with no named operations
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_operations(config, OperationRegistry::new())
    }

    /// Create a builder with a prepared operation registry
    pub fn with_operations(config: &ApiConfig, operations: OperationRegistry) -> Self {
        Self {
            format: EnvelopeFormat::from_config(config),
            match_status: config.match_status,
            messages: config.messages.clone(),
            operations,
        }
    }

    pub fn format(&self) -> &EnvelopeFormat {
        &self.format
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Build a response.
    ///
    /// The envelope always carries `status`. The HTTP status only follows it
    /// when `match_status` is enabled, otherwise the response goes out as 200.
    pub fn respond<I>(
        &self,
        status: StatusCode,
        message: Option<&str>,
        data: Value,
        extras: I,
    ) -> ApiResponse
    where
        I: IntoIterator<Item = Fragment>,
    {
        let body = self.format.build(status.as_u16(), message, data, extras);

        if self.match_status {
            ApiResponse::with_status(status, body)
        } else {
            ApiResponse::ok(body)
        }
    }

    /// 200 with the configured success message by default
    pub fn ok<I>(&self, message: Option<&str>, data: Option<Value>, extras: I) -> ApiResponse
    where
        I: IntoIterator<Item = Fragment>,
    {
        self.respond_kind(ResponseKind::Success, message, data, extras)
    }

    /// 404 with the configured not-found message by default.
    /// The payload is always empty and no fragments are merged.
    pub fn not_found(&self, message: Option<&str>) -> ApiResponse {
        self.respond_kind(ResponseKind::NotFound, message, None, [])
    }

    /// 422 carrying validation errors as the payload
    pub fn validation<I>(&self, message: Option<&str>, errors: Option<Value>, extras: I) -> ApiResponse
    where
        I: IntoIterator<Item = Fragment>,
    {
        self.respond_kind(ResponseKind::Validation, message, errors, extras)
    }

    /// 403 with the configured forbidden message by default
    pub fn forbidden<I>(&self, message: Option<&str>, data: Option<Value>, extras: I) -> ApiResponse
    where
        I: IntoIterator<Item = Fragment>,
    {
        self.respond_kind(ResponseKind::Forbidden, message, data, extras)
    }

    /// 500 with the configured error message by default
    pub fn error<I>(&self, message: Option<&str>, data: Option<Value>, extras: I) -> ApiResponse
    where
        I: IntoIterator<Item = Fragment>,
    {
        self.respond_kind(ResponseKind::Error, message, data, extras)
    }

    /// Dispatch to the convenience operation for `kind`
    pub fn for_kind<I>(
        &self,
        kind: ResponseKind,
        message: Option<&str>,
        data: Option<Value>,
        extras: I,
    ) -> ApiResponse
    where
        I: IntoIterator<Item = Fragment>,
    {
        match kind {
            ResponseKind::Success => self.ok(message, data, extras),
            ResponseKind::NotFound => self.not_found(message),
            ResponseKind::Validation => self.validation(message, data, extras),
            ResponseKind::Forbidden => self.forbidden(message, data, extras),
            ResponseKind::Error => self.error(message, data, extras),
        }
    }

    fn respond_kind<I>(
        &self,
        kind: ResponseKind,
        message: Option<&str>,
        data: Option<Value>,
        extras: I,
    ) -> ApiResponse
    where
        I: IntoIterator<Item = Fragment>,
    {
        let message = message.unwrap_or_else(|| self.messages.for_kind(kind));
        let status = StatusCode::from_u16(kind.status()).unwrap_or(StatusCode::OK);
        self.respond(status, Some(message), data.unwrap_or_else(empty_payload), extras)
    }

    /// Start a fluent reply for one of the fixed kinds
    pub fn reply(&self, kind: ResponseKind) -> Reply<'_> {
        Reply::new(self, Target::Kind(kind))
    }

    /// Start a fluent reply with an arbitrary status
    pub fn reply_status(&self, status: StatusCode) -> Reply<'_> {
        Reply::new(self, Target::Status(status))
    }

    /// Add a named operation. Replaces an earlier operation with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, operation: F) -> &mut Self
    where
        F: Fn(&ResponseBuilder, OperationArgs) -> ApiResponse + Send + Sync + 'static,
    {
        let name = name.into();
        if self.operations.register(name.clone(), operation) {
            debug!("Replaced response operation: {}", name);
        } else {
            debug!("Registered response operation: {}", name);
        }
        self
    }

    /// Add a named operation that responds with a fixed status and default message
    pub fn register_status(
        &mut self,
        name: impl Into<String>,
        status: StatusCode,
        default_message: impl Into<String>,
    ) -> &mut Self {
        let default_message = default_message.into();
        self.register(name, move |builder: &ResponseBuilder, args: OperationArgs| {
            builder.respond(
                status,
                Some(args.message.as_deref().unwrap_or(&default_message)),
                args.data.unwrap_or_else(empty_payload),
                args.extras,
            )
        })
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains(name)
    }

    pub fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    /// Invoke a named operation
    pub fn call(&self, name: &str, args: OperationArgs) -> Result<ApiResponse> {
        match self.operations.get(name) {
            Some(operation) => {
                debug!("Calling response operation: {}", name);
                Ok(operation(self, args))
            }
            None => {
                warn!("Unknown response operation: {}", name);
                Err(ResponseError::unknown_operation(name))
            }
        }
    }

    /// Render an error as an envelope.
    ///
    /// Unknown operations become a not-found response; anything else is a
    /// server error carrying the error text as its message.
    pub fn failure(&self, err: &ResponseError) -> ApiResponse {
        match err {
            ResponseError::UnknownOperation { .. } => self.not_found(Some(&err.to_string())),
            ResponseError::Envelope(EnvelopeError::Serialization { .. }) => {
                self.error(Some(&err.to_string()), None, [])
            }
            ResponseError::Envelope(_) => self.error(None, None, []),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Kind(ResponseKind),
    Status(StatusCode),
}

/// Accumulates message, payload and extra fields before sending
#[derive(Debug)]
pub struct Reply<'a> {
    builder: &'a ResponseBuilder,
    target: Target,
    message: Option<String>,
    data: Option<Value>,
    extras: Vec<Fragment>,
}

impl<'a> Reply<'a> {
    fn new(builder: &'a ResponseBuilder, target: Target) -> Self {
        Self {
            builder,
            target,
            message: None,
            data: None,
            extras: Vec::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Add a single extra field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fragment = Fragment::new();
        fragment.insert(key.into(), value.into());
        self.extras.push(fragment);
        self
    }

    /// Add a whole fragment
    pub fn fragment(mut self, fragment: Fragment) -> Self {
        self.extras.push(fragment);
        self
    }

    pub fn send(self) -> ApiResponse {
        let message = self.message.as_deref();
        match self.target {
            Target::Kind(kind) => self.builder.for_kind(kind, message, self.data, self.extras),
            Target::Status(status) => self.builder.respond(
                status,
                message,
                self.data.unwrap_or_else(empty_payload),
                self.extras,
            ),
        }
    }
}
