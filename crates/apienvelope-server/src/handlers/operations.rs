use crate::registry::OperationArgs;
use crate::{ApiResponse, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

/// GET /api/v1/ops
pub async fn list_operations(State(state): State<AppState>) -> ApiResponse {
    let names = state.responses.operations().names();
    state
        .responses
        .ok(None, Some(serde_json::json!(names)), [])
}

/// POST /api/v1/ops/{name}
///
/// Runs a named operation with the arguments in the body. A missing or
/// malformed body is answered with a validation envelope.
pub async fn call_operation(
    State(state): State<AppState>,
    Path(name): Path<String>,
    args: Result<Json<OperationArgs>, JsonRejection>,
) -> ApiResponse {
    let args = match args {
        Ok(Json(args)) => args,
        Err(rejection) => {
            return state
                .responses
                .validation(Some(&rejection.body_text()), None, [])
        }
    };

    state
        .responses
        .call(&name, args)
        .unwrap_or_else(|e| state.responses.failure(&e))
}
