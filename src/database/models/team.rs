use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Static roster row, seeded once and never written through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
}
