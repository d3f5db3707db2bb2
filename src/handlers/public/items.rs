// handlers/public/items.rs - GET /api/items, GET /api/items/:id

use axum::extract::{rejection::QueryRejection, Path, Query, State};

use crate::database::models::Item;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ItemSearch;
use crate::state::AppState;

/// GET /api/items?category=food|drink&q=text - newest first, no pagination
///
/// Filters are lenient: an unparsable query string or a repeated key means no filter.
pub async fn items_get(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Vec<Item>> {
    let search = match query {
        Ok(Query(pairs)) => ItemSearch::from_pairs(&pairs),
        Err(rejection) => {
            tracing::debug!("Ignoring unparsable item query: {}", rejection.body_text());
            ItemSearch::default()
        }
    };
    let items = state.catalog.list_items(&search).await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/items/:id - single item or 404
pub async fn item_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Item> {
    let item = state.catalog.get_item(&id).await?;
    Ok(ApiResponse::success(item))
}
