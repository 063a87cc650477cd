use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::StringUuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
    Product,
    Service,
    Consulting,
    License,
    Maintenance,
    Training,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Product => "product",
            Category::Service => "service",
            Category::Consulting => "consulting",
            Category::License => "license",
            Category::Maintenance => "maintenance",
            Category::Training => "training",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Category::Product),
            "service" => Ok(Category::Service),
            "consulting" => Ok(Category::Consulting),
            "license" => Ok(Category::License),
            "maintenance" => Ok(Category::Maintenance),
            "training" => Ok(Category::Training),
            "other" => Ok(Category::Other),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    pub id: StringUuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub category: Category,
    pub sku: Option<String>,
    pub stock: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw product input as received over the wire, before validation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductPayload {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub stock: Option<i64>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    Add,
    Subtract,
    Set,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StockUpdatePayload {
    pub operation: StockOperation,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct ProductFilter {
    pub category: Option<Category>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
    /// Case-insensitive substring match over name and sku.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in [
            Category::Product,
            Category::Service,
            Category::Consulting,
            Category::License,
            Category::Maintenance,
            Category::Training,
            Category::Other,
        ] {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("hardware".parse::<Category>().is_err());
    }

    #[test]
    fn test_stock_operation_deserialize() {
        let payload: StockUpdatePayload =
            serde_json::from_str(r#"{"operation":"subtract","quantity":3}"#).unwrap();
        assert_eq!(payload.operation, StockOperation::Subtract);
        assert_eq!(payload.quantity, 3);
    }
}
