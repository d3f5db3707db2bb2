use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Menu section an item belongs to. Mirrors the `CHECK(category IN ('food','drink'))` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
    Food,
    Drink,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("category must be 'food' or 'drink', got '{0}'")]
pub struct UnknownCategory(pub String);

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Drink => "drink",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Category::Food),
            "drink" => Ok(Category::Drink),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub category: Category,
    pub image: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Raw write body as sent by the admin page. Nothing here is trusted yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPayload {
    pub name: Option<String>,
    pub price: Option<Value>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Validated column values for an insert or a full overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub price: i64,
    pub category: Category,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl ItemDraft {
    /// Positional values in `name, price, category, image, description` order.
    pub fn to_params(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.as_str()),
            Value::from(self.price),
            Value::from(self.category.as_str()),
            self.image.as_deref().map_or(Value::Null, Value::from),
            self.description.as_deref().map_or(Value::Null, Value::from),
        ]
    }
}

/// Coerce a loosely typed price into a non-negative integer.
///
/// Numbers and numeric strings are truncated toward zero; anything non-numeric or
/// non-finite becomes 0, and negative values clamp to 0.
pub fn coerce_price(raw: Option<&Value>) -> i64 {
    let number = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => (n.trunc() as i64).max(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_categories_only() {
        assert_eq!("food".parse::<Category>(), Ok(Category::Food));
        assert_eq!("drink".parse::<Category>(), Ok(Category::Drink));
        assert_eq!("Food".parse::<Category>(), Err(UnknownCategory("Food".to_string())));
        assert!("dessert".parse::<Category>().is_err());
    }

    #[test]
    fn price_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_price(Some(&json!(25000))), 25000);
        assert_eq!(coerce_price(Some(&json!("18000"))), 18000);
        assert_eq!(coerce_price(Some(&json!(" 42 "))), 42);
        assert_eq!(coerce_price(Some(&json!(12.9))), 12);
        assert_eq!(coerce_price(Some(&json!("1e3"))), 1000);
        assert_eq!(coerce_price(Some(&json!(true))), 1);
    }

    #[test]
    fn price_defaults_to_zero_when_not_numeric() {
        assert_eq!(coerce_price(None), 0);
        assert_eq!(coerce_price(Some(&Value::Null)), 0);
        assert_eq!(coerce_price(Some(&json!("abc"))), 0);
        assert_eq!(coerce_price(Some(&json!(""))), 0);
        assert_eq!(coerce_price(Some(&json!("Infinity"))), 0);
        assert_eq!(coerce_price(Some(&json!("NaN"))), 0);
        assert_eq!(coerce_price(Some(&json!([5]))), 0);
        assert_eq!(coerce_price(Some(&json!({"amount": 5}))), 0);
    }

    #[test]
    fn negative_price_clamps_to_zero() {
        assert_eq!(coerce_price(Some(&json!(-5))), 0);
        assert_eq!(coerce_price(Some(&json!("-12.5"))), 0);
    }

    #[test]
    fn draft_params_follow_column_order() {
        let draft = ItemDraft {
            name: "Bánh mì".to_string(),
            price: 20000,
            category: Category::Food,
            image: None,
            description: Some("giòn".to_string()),
        };
        assert_eq!(
            draft.to_params(),
            vec![json!("Bánh mì"), json!(20000), json!("food"), Value::Null, json!("giòn")]
        );
    }

    #[test]
    fn item_serializes_category_lowercase() {
        let created_at = NaiveDateTime::parse_from_str("2024-05-01 08:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let item = Item {
            id: 3,
            name: "Trà đá".to_string(),
            price: 0,
            category: Category::Drink,
            image: None,
            description: None,
            created_at,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["category"], json!("drink"));
        assert_eq!(value["image"], Value::Null);
        assert_eq!(value["id"], json!(3));
    }
}
