// handlers/protected/items.rs - POST /api/items, PUT /api/items/:id, DELETE /api/items/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::{Item, ItemPayload};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/items - create, 201 with the stored row
pub async fn items_post(
    State(state): State<AppState>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> ApiResult<Item> {
    let Json(payload) = payload?;
    let item = state.catalog.create_item(payload).await?;
    Ok(ApiResponse::created(item))
}

/// PUT /api/items/:id - full overwrite, 404 when the id does not exist
pub async fn item_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> ApiResult<Item> {
    let Json(payload) = payload?;
    let item = state.catalog.update_item(&id, payload).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/items/:id - always `{ok: true}`, even when nothing matched
pub async fn item_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    state.catalog.delete_item(&id).await?;
    Ok(ApiResponse::success(json!({ "ok": true })))
}
