use crate::{ApiResponse, ResponseBuilder};
use apienvelope_core::{Fragment, Value};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Arguments passed to a named operation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OperationArgs {
    /// Message, or None for the operation's default
    pub message: Option<String>,

    /// Payload, or None for an empty array
    pub data: Option<Value>,

    /// Fragments merged after the core fields
    pub extras: Vec<Fragment>,
}

impl OperationArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn extra(mut self, fragment: Fragment) -> Self {
        self.extras.push(fragment);
        self
    }
}

/// A named response operation. Implementations call back into the builder.
pub type OperationFn = Arc<dyn Fn(&ResponseBuilder, OperationArgs) -> ApiResponse + Send + Sync>;

/// Named operations added to a builder at startup
#[derive(Clone, Default)]
pub struct OperationRegistry {
    operations: HashMap<String, OperationFn>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation, replacing any earlier one with the same name.
    /// Returns true if an operation was replaced.
    pub fn register<F>(&mut self, name: impl Into<String>, operation: F) -> bool
    where
        F: Fn(&ResponseBuilder, OperationArgs) -> ApiResponse + Send + Sync + 'static,
    {
        self.operations
            .insert(name.into(), Arc::new(operation))
            .is_some()
    }

    pub fn get(&self, name: &str) -> Option<&OperationFn> {
        self.operations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apienvelope_core::ApiConfig;
    use axum::http::StatusCode;

    fn teapot(builder: &ResponseBuilder, args: OperationArgs) -> ApiResponse {
        builder.respond(
            StatusCode::IM_A_TEAPOT,
            args.message.as_deref(),
            args.data.unwrap_or_else(apienvelope_core::empty_payload),
            args.extras,
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = OperationRegistry::new();
        assert!(registry.is_empty());

        assert!(!registry.register("teapot", teapot));
        assert!(registry.contains("teapot"));
        assert!(!registry.contains("coffee"));
        assert_eq!(registry.len(), 1);

        let builder = ResponseBuilder::new(&ApiConfig::default());
        let op = registry.get("teapot").unwrap();
        let response = op(&builder, OperationArgs::new().message("short and stout"));
        assert_eq!(
            response.body().get("status"),
            Some(&serde_json::json!(418))
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = OperationRegistry::new();
        registry.register("teapot", teapot);
        let replaced = registry.register("teapot", |builder: &ResponseBuilder, args| {
            builder.ok(args.message.as_deref(), args.data, args.extras)
        });
        assert!(replaced);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = OperationRegistry::new();
        registry.register("created", teapot);
        registry.register("accepted", teapot);
        assert_eq!(registry.names(), ["accepted", "created"]);
        assert_eq!(
            format!("{:?}", registry),
            r#"OperationRegistry { operations: ["accepted", "created"] }"#
        );
    }

    #[test]
    fn test_args_deserialize() {
        let args: OperationArgs = serde_json::from_str(
            r#"{"message": "hi", "extras": [{"page": 2}]}"#,
        )
        .unwrap();
        assert_eq!(args.message.as_deref(), Some("hi"));
        assert!(args.data.is_none());
        assert_eq!(args.extras.len(), 1);

        let empty: OperationArgs = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, OperationArgs::default());
    }
}
