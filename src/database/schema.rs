use serde_json::Value;
use sqlx::FromRow;
use tracing::info;

use super::store::{Store, StoreError};

/// Columns of `items`, in declaration order.
pub const ITEM_COLUMNS: [&str; 7] = ["id", "name", "price", "category", "image", "description", "created_at"];

/// Columns of `team`, in declaration order.
pub const TEAM_COLUMNS: [&str; 3] = ["id", "name", "role"];

const CREATE_ITEMS: &str = "CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    price INTEGER NOT NULL DEFAULT 0,
    category TEXT CHECK(category IN ('food','drink')) NOT NULL,
    image TEXT,
    description TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)";

const CREATE_TEAM: &str = "CREATE TABLE IF NOT EXISTS team (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    role TEXT
)";

/// Roster inserted the first time the `team` table is found empty.
pub const SEED_TEAM: [(&str, &str); 3] = [
    ("Nguyễn Hoàng Nhân", "UI/Frontend"),
    ("Trần Minh Thư", "Logic/Frontend"),
    ("Đỗ Thị Duyên", "Backend/DB"),
];

#[derive(Debug, FromRow)]
struct RowCount {
    c: i64,
}

/// Create both tables and seed the roster. Safe to run on every startup.
pub async fn init_schema(store: &Store) -> Result<(), StoreError> {
    store.execute(CREATE_ITEMS, &[]).await?;
    store.execute(CREATE_TEAM, &[]).await?;

    // Guarded by a row count, not a uniqueness constraint
    let count = store
        .query_one::<RowCount>("SELECT COUNT(*) AS c FROM team", &[])
        .await?
        .map_or(0, |row| row.c);

    if count == 0 {
        for (name, role) in SEED_TEAM {
            store
                .execute(
                    "INSERT INTO team(name, role) VALUES(?, ?)",
                    &[Value::from(name), Value::from(role)],
                )
                .await?;
        }
        info!("Seeded team roster with {} member(s)", SEED_TEAM.len());
    }

    Ok(())
}
