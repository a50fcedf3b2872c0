//! Database access layer
//!
//! The workflows talk to persistence through the store traits below.
//! [`PgStore`] implements them over PostgreSQL by delegating to the query
//! functions in the per-entity modules, which take a `&PgPool` directly.

pub mod catalog;
pub mod category;
#[cfg(test)]
pub mod memory;
pub mod orders;
pub mod pg;
pub mod reservations;

pub use pg::PgStore;

use async_trait::async_trait;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, MenuItem, MenuItemCreate, MenuItemQuery,
    MenuItemUpdate, Order, OrderDetail, OrderLineItem, OrderStats, OrderStatus, Reservation,
    ReservationCreate, ReservationUpdate,
};
use uuid::Uuid;

use crate::error::ServiceResult;

/// Order listing filter
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub user_id: Option<Uuid>,
    /// Attach the owner summary to each order
    pub include_user: bool,
}

/// Categories and menu items
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Active categories, `sort_order` ascending then name
    async fn list_categories(&self) -> ServiceResult<Vec<Category>>;
    async fn create_category(&self, data: &CategoryCreate, now: i64) -> ServiceResult<Category>;
    /// `Ok(None)` when the category does not exist
    async fn update_category(
        &self,
        id: Uuid,
        data: &CategoryUpdate,
        now: i64,
    ) -> ServiceResult<Option<Category>>;

    /// Newest first, category summary attached
    async fn list_menu_items(&self, query: &MenuItemQuery) -> ServiceResult<Vec<MenuItem>>;
    async fn find_menu_item(&self, id: Uuid) -> ServiceResult<Option<MenuItem>>;
    async fn create_menu_item(&self, data: &MenuItemCreate, now: i64) -> ServiceResult<MenuItem>;
    async fn update_menu_item(
        &self,
        id: Uuid,
        data: &MenuItemUpdate,
        now: i64,
    ) -> ServiceResult<Option<MenuItem>>;
    /// Returns false when nothing was deleted
    async fn delete_menu_item(&self, id: Uuid) -> ServiceResult<bool>;
}

/// Orders and their line items
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist header and lines atomically
    async fn insert_order(&self, order: &Order, items: &[OrderLineItem]) -> ServiceResult<()>;
    /// Newest first, line items expanded
    async fn list_orders(&self, filter: OrderFilter) -> ServiceResult<Vec<OrderDetail>>;
    /// `Ok(None)` when the order does not exist
    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        now: i64,
    ) -> ServiceResult<Option<OrderDetail>>;
    async fn order_stats(&self) -> ServiceResult<OrderStats>;
}

/// Table reservations
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn create_reservation(
        &self,
        user_id: Uuid,
        data: &ReservationCreate,
        now: i64,
    ) -> ServiceResult<Reservation>;
    /// `date DESC, time DESC`; all users (with owner summary) when `user_id` is `None`
    async fn list_reservations(&self, user_id: Option<Uuid>) -> ServiceResult<Vec<Reservation>>;
    /// `Ok(None)` when the reservation does not exist
    async fn update_reservation(
        &self,
        id: Uuid,
        data: &ReservationUpdate,
        now: i64,
    ) -> ServiceResult<Option<Reservation>>;
}

/// Full persistence surface used by the server
#[async_trait]
pub trait Store: CatalogStore + OrderStore + ReservationStore {
    /// Round-trip to the backing store
    async fn ping(&self) -> ServiceResult<()>;
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
