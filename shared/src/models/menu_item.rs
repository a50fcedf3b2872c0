//! Menu Item Model

use super::category::CategorySummary;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Current unit price, snapshotted into line items at order time
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub discount_price: Option<Decimal>,
    pub image: Option<String>,
    /// Average rating (0.0 - 5.0)
    pub rating: Decimal,
    pub reviews: i32,
    pub is_vegetarian: bool,
    pub is_available: bool,
    /// Preparation time in minutes
    pub preparation_time: Option<i32>,
    pub tags: Vec<String>,
    pub badge: Option<String>,
    /// Discount percentage (0 - 100)
    pub discount: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub discount_price: Option<Decimal>,
    pub image: Option<String>,
    pub rating: Option<Decimal>,
    pub reviews: Option<i32>,
    pub is_vegetarian: Option<bool>,
    pub is_available: Option<bool>,
    pub preparation_time: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub badge: Option<String>,
    pub discount: Option<i32>,
}

/// Update menu item payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub discount_price: Option<Decimal>,
    pub image: Option<String>,
    pub rating: Option<Decimal>,
    pub reviews: Option<i32>,
    pub is_vegetarian: Option<bool>,
    pub is_available: Option<bool>,
    pub preparation_time: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub badge: Option<String>,
    pub discount: Option<i32>,
}

/// Menu listing filter (`?category=<uuid>&search=<text>`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemQuery {
    pub category: Option<Uuid>,
    pub search: Option<String>,
}
