use apienvelope_core::Envelope;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Envelope paired with the HTTP status it is sent with
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Envelope,
}

impl ApiResponse {
    /// Create a new response with 200 OK
    pub fn ok(body: Envelope) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    /// Create a new response with custom status
    pub fn with_status(status: StatusCode, body: Envelope) -> Self {
        Self { status, body }
    }

    /// HTTP status the response is sent with
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Envelope {
        &self.body
    }

    pub fn into_body(self) -> Envelope {
        self.body
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
