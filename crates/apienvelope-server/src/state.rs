use crate::handlers::Item;
use crate::ResponseBuilder;
use apienvelope_core::ApiConfig;
use axum::http::StatusCode;
use std::sync::Arc;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Response builder, read-only after startup
    pub responses: Arc<ResponseBuilder>,

    /// Demo catalog served by the item endpoints
    pub items: Arc<Vec<Item>>,
}

impl AppState {
    /// Create state with the standard named operations and the demo catalog
    pub fn new(config: &ApiConfig) -> Self {
        let mut responses = ResponseBuilder::new(config);
        register_standard_operations(&mut responses);

        Self::with_builder(responses, Item::catalog())
    }

    /// Create state from a prepared builder
    pub fn with_builder(responses: ResponseBuilder, items: Vec<Item>) -> Self {
        Self {
            responses: Arc::new(responses),
            items: Arc::new(items),
        }
    }
}

/// Named operations available to every handler
pub fn register_standard_operations(responses: &mut ResponseBuilder) {
    responses
        .register_status("created", StatusCode::CREATED, "Resource created")
        .register_status("accepted", StatusCode::ACCEPTED, "Request accepted")
        .register_status("unauthorized", StatusCode::UNAUTHORIZED, "Unauthenticated");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_operations() {
        let state = AppState::new(&ApiConfig::default());
        assert_eq!(
            state.responses.operations().names(),
            ["accepted", "created", "unauthorized"]
        );
        assert!(!state.items.is_empty());
    }
}
