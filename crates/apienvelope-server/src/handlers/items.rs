use crate::registry::OperationArgs;
use crate::{ApiResponse, AppState};
use apienvelope_core::{fragment, to_payload};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// Maximum number of tags accepted on a new item
pub const MAX_TAGS: usize = 5;

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    pub fn new(id: u32, name: impl Into<String>, tags: &[&str]) -> Self {
        Self {
            id,
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Fixed catalog served by the demo endpoints
    pub fn catalog() -> Vec<Item> {
        vec![
            Item::new(1, "keyboard", &["hardware", "input"]),
            Item::new(2, "mouse", &["hardware", "input"]),
            Item::new(3, "monitor", &["hardware", "display"]),
        ]
    }
}

/// Body of POST /api/v1/items
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewItem {
    /// Field errors keyed by field name, or None when the item is valid
    pub fn errors(&self) -> Option<Value> {
        let mut errors = Map::new();

        if self.name.trim().is_empty() {
            errors.insert("name".to_string(), json!(["The name field is required."]));
        }
        if self.tags.len() > MAX_TAGS {
            errors.insert(
                "tags".to_string(),
                json!([format!("The tags field may not have more than {} items.", MAX_TAGS)]),
            );
        }

        if errors.is_empty() {
            None
        } else {
            Some(Value::Object(errors))
        }
    }
}

/// Query parameters for GET /api/v1/items
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub tag: Option<String>,
}

/// GET /api/v1/items
pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> ApiResponse {
    let items: Vec<&Item> = state
        .items
        .iter()
        .filter(|item| match &filter.tag {
            Some(tag) => item.tags.iter().any(|t| t == tag),
            None => true,
        })
        .collect();

    debug!("Listing {} items (tag filter: {:?})", items.len(), filter.tag);

    let extras = filter.tag.as_deref().map(|tag| fragment([("tag", tag)]));

    match to_payload(&items) {
        Ok(data) => state.responses.ok(None, Some(data), extras),
        Err(e) => state.responses.failure(&e.into()),
    }
}

/// GET /api/v1/items/{id}
///
/// An id that is not a number cannot name an item, so it is reported as not found.
pub async fn get_item(
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
) -> ApiResponse {
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => {
            debug!("Rejected item id: {}", rejection.body_text());
            return state.responses.not_found(Some(&rejection.body_text()));
        }
    };

    let Some(item) = state.items.iter().find(|item| item.id == id) else {
        return state
            .responses
            .not_found(Some(&format!("Item {} does not exist", id)));
    };

    match to_payload(item) {
        Ok(data) => state.responses.ok(None, Some(data), []),
        Err(e) => state.responses.failure(&e.into()),
    }
}

/// POST /api/v1/items
///
/// Validates the item and echoes it back through the `created` operation.
pub async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<NewItem>, JsonRejection>,
) -> ApiResponse {
    let new_item = match body {
        Ok(Json(new_item)) => new_item,
        Err(rejection) => {
            return state
                .responses
                .validation(Some(&rejection.body_text()), None, [])
        }
    };

    if let Some(errors) = new_item.errors() {
        return state.responses.validation(None, Some(errors), []);
    }

    let id = state.items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
    let item = Item {
        id,
        name: new_item.name,
        tags: new_item.tags,
    };

    info!("Accepted new item {} ({})", item.id, item.name);

    let args = match to_payload(&item) {
        Ok(data) => OperationArgs::new()
            .data(data)
            .extra(fragment([("location", format!("/api/v1/items/{}", id))])),
        Err(e) => return state.responses.failure(&e.into()),
    };

    state
        .responses
        .call("created", args)
        .unwrap_or_else(|e| state.responses.failure(&e))
}
