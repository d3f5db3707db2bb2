// handlers/public/meta.rs - GET /api/meta

use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CatalogMeta;
use crate::state::AppState;

/// Database location and the column layout of both tables.
pub async fn meta_get(State(state): State<AppState>) -> ApiResult<CatalogMeta> {
    Ok(ApiResponse::success(state.catalog.meta()))
}
