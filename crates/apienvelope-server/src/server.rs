use crate::handlers::*;
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to listen on
    pub listen_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// API server
pub struct ApiServer {
    config: Config,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: Config, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router
    pub fn build_router(&self) -> Router {
        router(self.state.clone())
    }

    /// Run the server
    pub async fn run(self) -> Result<(), std::io::Error> {
        let app = self.build_router();

        info!("Starting API server on {}", self.config.listen_addr);

        let listener = TcpListener::bind(self.config.listen_addr).await?;

        axum::serve(listener, app).await
    }
}

/// Routes of the demo API
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/healthz", get(healthz))
        // Fixed kinds
        .route("/api/v1/ping", get(ping))
        .route("/api/v1/admin", get(admin))
        .route("/api/v1/crash", get(crash))
        // Items
        .route("/api/v1/items", get(list_items).post(create_item))
        .route("/api/v1/items/{id}", get(get_item))
        // Named operations
        .route("/api/v1/ops", get(list_operations))
        .route("/api/v1/ops/{name}", post(call_operation))
        // Add tracing and state
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use apienvelope_core::ApiConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(config: ApiConfig) -> Router {
        router(AppState::new(&config))
    }

    fn matching() -> ApiConfig {
        ApiConfig {
            match_status: true,
            ..ApiConfig::default()
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, String) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, String) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn test_healthz() {
        let (status, body) = fetch(app(ApiConfig::default()), "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_ping() {
        let (status, body) = fetch(app(ApiConfig::default()), "/api/v1/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":200,"message":"pong","data":[]}"#);
    }

    #[tokio::test]
    async fn test_missing_item_keeps_http_200_without_match_status() {
        let (status, body) = fetch(app(ApiConfig::default()), "/api/v1/items/99").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"{"status":404,"message":"Item 99 does not exist","data":[]}"#
        );
    }

    #[tokio::test]
    async fn test_missing_item_with_match_status() {
        let (status, _) = fetch(app(matching()), "/api/v1/items/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_items_with_count_and_filter() {
        let config = ApiConfig {
            include_data_count: true,
            stringify: true,
            ..ApiConfig::default()
        };

        let (status, body) = fetch(app(config), "/api/v1/items?tag=input").await;
        assert_eq!(status, StatusCode::OK);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], json!("200"));
        assert_eq!(value["DATA_COUNT"], json!(2));
        assert_eq!(value["tag"], json!("input"));
        assert_eq!(value["data"][1]["name"], json!("mouse"));

        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["status", "message", "data", "DATA_COUNT", "tag"]);
    }

    #[tokio::test]
    async fn test_list_items_empty_result_has_no_count() {
        let config = ApiConfig {
            include_data_count: true,
            ..ApiConfig::default()
        };

        let (_, body) = fetch(app(config), "/api/v1/items?tag=furniture").await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["data"], json!([]));
        assert!(value.get("DATA_COUNT").is_none());
    }

    #[tokio::test]
    async fn test_create_item_validation() {
        let (status, body) =
            post_json(app(matching()), "/api/v1/items", json!({"name": ""})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], json!(422));
        assert_eq!(
            value["data"]["name"],
            json!(["The name field is required."])
        );
    }

    #[tokio::test]
    async fn test_create_item() {
        let (status, body) = post_json(
            app(matching()),
            "/api/v1/items",
            json!({"name": "webcam", "tags": ["hardware"]}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            r#"{"status":201,"message":"Resource created","data":{"id":4,"name":"webcam","tags":["hardware"]},"location":"/api/v1/items/4"}"#
        );
    }

    #[tokio::test]
    async fn test_forbidden_and_error() {
        let (status, body) = fetch(app(matching()), "/api/v1/admin").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["message"], json!(ApiConfig::default().messages.forbidden));

        let (status, body) = fetch(app(matching()), "/api/v1/crash").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["retry_after"], json!(30));
    }

    #[tokio::test]
    async fn test_named_operations() {
        let (_, body) = fetch(app(ApiConfig::default()), "/api/v1/ops").await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["data"], json!(["accepted", "created", "unauthorized"]));

        let (status, body) = post_json(
            app(matching()),
            "/api/v1/ops/unauthorized",
            json!({"extras": [{"realm": "api"}]}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            r#"{"status":401,"message":"Unauthenticated","data":[],"realm":"api"}"#
        );
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let (status, body) = post_json(app(matching()), "/api/v1/ops/teapot", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            value["message"],
            json!("Unknown response operation: teapot")
        );
    }

    #[tokio::test]
    async fn test_non_numeric_item_id_is_not_found_envelope() {
        let (status, body) = fetch(app(matching()), "/api/v1/items/abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], json!(404));
        assert_eq!(value["data"], json!([]));
        assert!(value["message"].is_string());
    }

    #[tokio::test]
    async fn test_operation_without_body_is_validation_envelope() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/ops/created")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(matching()), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], json!(422));
        assert_eq!(value["data"], json!([]));
    }

    #[tokio::test]
    async fn test_malformed_item_body_is_validation_envelope() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/items")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();
        let (status, body) = send(app(ApiConfig::default()), request).await;
        assert_eq!(status, StatusCode::OK);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], json!(422));
        assert!(value["message"].is_string());
    }
}
