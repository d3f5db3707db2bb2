use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::database::models::{coerce_price, Category, Item, ItemDraft, ItemPayload, TeamMember};
use crate::database::schema::{ITEM_COLUMNS, TEAM_COLUMNS};
use crate::database::{Store, StoreError};
use crate::filter::{Filter, FilterError, SortDirection};

pub const REQUIRED_FIELDS_MESSAGE: &str = "name & category required";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("Item {0} not found")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Query build error: {0}")]
    Filter(#[from] FilterError),
}

/// Query string of `GET /api/items`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSearch {
    pub category: Option<String>,
    pub q: Option<String>,
}

impl ItemSearch {
    /// Build from raw query pairs. A key given more than once is ambiguous and dropped,
    /// so it filters nothing; unknown keys are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let single = |key: &str| {
            let mut values = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v);
            match (values.next(), values.next()) {
                (Some(value), None) => Some(value.clone()),
                _ => None,
            }
        };

        Self {
            category: single("category"),
            q: single("q"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMeta {
    pub db_path: String,
    pub tables: MetaTables,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaTables {
    pub items: &'static [&'static str],
    pub team: &'static [&'static str],
}

/// Request-level orchestration over the store: validation, filters, CRUD.
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Newest-first list, optionally narrowed by category and a text query.
    ///
    /// An unrecognised category is ignored rather than rejected, and a blank `q` is no filter.
    pub async fn list_items(&self, search: &ItemSearch) -> Result<Vec<Item>, CatalogError> {
        let mut filter = Filter::new("items")?;
        filter.select(&ITEM_COLUMNS)?;

        if let Some(category) = search.category.as_deref().and_then(|c| c.parse::<Category>().ok()) {
            filter.where_eq("category", category.as_str())?;
        }
        if let Some(q) = search.q.as_deref().filter(|q| !q.is_empty()) {
            filter.where_contains_any(&["name", "description"], q)?;
        }
        filter.order("id", SortDirection::Desc)?;

        let sql = filter.to_sql();
        Ok(self.store.query_all(&sql.query, &sql.params).await?)
    }

    pub async fn find_item(&self, id: i64) -> Result<Option<Item>, CatalogError> {
        let mut filter = Filter::new("items")?;
        filter.select(&ITEM_COLUMNS)?.where_eq("id", id)?;

        let sql = filter.to_sql();
        Ok(self.store.query_one(&sql.query, &sql.params).await?)
    }

    /// Point lookup by raw path segment; an id that is not an integer is simply absent.
    pub async fn get_item(&self, raw_id: &str) -> Result<Item, CatalogError> {
        let id = parse_item_id(raw_id).ok_or_else(|| CatalogError::NotFound(raw_id.to_string()))?;
        self.find_item(id).await?.ok_or_else(|| CatalogError::NotFound(raw_id.to_string()))
    }

    pub async fn create_item(&self, payload: ItemPayload) -> Result<Item, CatalogError> {
        let draft = validate_payload(payload)?;

        let result = self
            .store
            .execute(
                "INSERT INTO items(name, price, category, image, description) VALUES(?, ?, ?, ?, ?)",
                &draft.to_params(),
            )
            .await?;

        // Separate round trip; a concurrent delete can win in between.
        let id = result.last_insert_id;
        let item = self.find_item(id).await?.ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        info!("Created item {} ({})", item.id, item.category);
        Ok(item)
    }

    /// Overwrite every mutable column. Omitted optional fields are written as NULL / 0.
    pub async fn update_item(&self, raw_id: &str, payload: ItemPayload) -> Result<Item, CatalogError> {
        let draft = validate_payload(payload)?;
        let id = parse_item_id(raw_id).ok_or_else(|| CatalogError::NotFound(raw_id.to_string()))?;

        let mut params = draft.to_params();
        params.push(Value::from(id));
        self.store
            .execute(
                "UPDATE items SET name = ?, price = ?, category = ?, image = ?, description = ? WHERE id = ?",
                &params,
            )
            .await?;

        let item = self.find_item(id).await?.ok_or_else(|| CatalogError::NotFound(raw_id.to_string()))?;
        info!("Updated item {}", item.id);
        Ok(item)
    }

    /// Hard delete. Absent or malformed ids are a no-op, never an error.
    pub async fn delete_item(&self, raw_id: &str) -> Result<u64, CatalogError> {
        let Some(id) = parse_item_id(raw_id) else {
            return Ok(0);
        };

        let result = self.store.execute("DELETE FROM items WHERE id = ?", &[Value::from(id)]).await?;
        if result.rows_affected > 0 {
            info!("Deleted item {}", id);
        }
        Ok(result.rows_affected)
    }

    pub async fn list_team(&self) -> Result<Vec<TeamMember>, CatalogError> {
        let mut filter = Filter::new("team")?;
        filter.select(&TEAM_COLUMNS)?.order("id", SortDirection::Asc)?;

        let sql = filter.to_sql();
        Ok(self.store.query_all(&sql.query, &sql.params).await?)
    }

    pub fn meta(&self) -> CatalogMeta {
        CatalogMeta {
            db_path: self.store.path().to_string(),
            tables: MetaTables {
                items: &ITEM_COLUMNS,
                team: &TEAM_COLUMNS,
            },
        }
    }
}

pub fn parse_item_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

fn validate_payload(payload: ItemPayload) -> Result<ItemDraft, CatalogError> {
    let name = payload.name.filter(|n| !n.is_empty());
    let category = payload.category.filter(|c| !c.is_empty());

    let (Some(name), Some(category)) = (name, category) else {
        return Err(CatalogError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
    };
    let category = category
        .parse::<Category>()
        .map_err(|e| CatalogError::Validation(e.to_string()))?;

    Ok(ItemDraft {
        name,
        price: coerce_price(payload.price.as_ref()),
        category,
        image: payload.image.filter(|s| !s.is_empty()),
        description: payload.description.filter(|s| !s.is_empty()),
    })
}
