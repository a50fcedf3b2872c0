//! PostgreSQL-backed store

use async_trait::async_trait;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, MenuItem, MenuItemCreate, MenuItemQuery,
    MenuItemUpdate, Order, OrderDetail, OrderLineItem, OrderStats, OrderStatus, Reservation,
    ReservationCreate, ReservationUpdate,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{
    CatalogStore, OrderFilter, OrderStore, ReservationStore, Store, catalog, category, orders,
    reservations,
};
use crate::config::Config;
use crate::error::{BoxError, ServiceResult};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect, run migrations and verify the connection
    pub async fn connect(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .idle_timeout(config.db_idle_timeout)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        tracing::info!(
            max_connections = config.db_max_connections,
            "Database connected and migrated"
        );
        Ok(Self { pool })
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        category::list_active(&self.pool).await
    }

    async fn create_category(&self, data: &CategoryCreate, now: i64) -> ServiceResult<Category> {
        category::create(&self.pool, data, now).await
    }

    async fn update_category(
        &self,
        id: Uuid,
        data: &CategoryUpdate,
        now: i64,
    ) -> ServiceResult<Option<Category>> {
        category::update(&self.pool, id, data, now).await
    }

    async fn list_menu_items(&self, query: &MenuItemQuery) -> ServiceResult<Vec<MenuItem>> {
        catalog::list(&self.pool, query).await
    }

    async fn find_menu_item(&self, id: Uuid) -> ServiceResult<Option<MenuItem>> {
        catalog::find(&self.pool, id).await
    }

    async fn create_menu_item(&self, data: &MenuItemCreate, now: i64) -> ServiceResult<MenuItem> {
        catalog::create(&self.pool, data, now).await
    }

    async fn update_menu_item(
        &self,
        id: Uuid,
        data: &MenuItemUpdate,
        now: i64,
    ) -> ServiceResult<Option<MenuItem>> {
        catalog::update(&self.pool, id, data, now).await
    }

    async fn delete_menu_item(&self, id: Uuid) -> ServiceResult<bool> {
        catalog::delete(&self.pool, id).await
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(&self, order: &Order, items: &[OrderLineItem]) -> ServiceResult<()> {
        orders::insert(&self.pool, order, items).await
    }

    async fn list_orders(&self, filter: OrderFilter) -> ServiceResult<Vec<OrderDetail>> {
        orders::list(&self.pool, filter).await
    }

    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        now: i64,
    ) -> ServiceResult<Option<OrderDetail>> {
        orders::update_status(&self.pool, id, status, now).await
    }

    async fn order_stats(&self) -> ServiceResult<OrderStats> {
        orders::stats(&self.pool).await
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn create_reservation(
        &self,
        user_id: Uuid,
        data: &ReservationCreate,
        now: i64,
    ) -> ServiceResult<Reservation> {
        reservations::create(&self.pool, user_id, data, now).await
    }

    async fn list_reservations(&self, user_id: Option<Uuid>) -> ServiceResult<Vec<Reservation>> {
        reservations::list(&self.pool, user_id).await
    }

    async fn update_reservation(
        &self,
        id: Uuid,
        data: &ReservationUpdate,
        now: i64,
    ) -> ServiceResult<Option<Reservation>> {
        reservations::update(&self.pool, id, data, now).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> ServiceResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Fixtures for database-backed tests
///
/// These tests run against `DATABASE_URL` and return early when it is unset.
/// Every fixture uses fresh ids and names so tests can share one database.
#[cfg(test)]
pub(crate) mod testing {
    use rust_decimal::Decimal;
    use shared::models::MenuItemCreate;
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::PgStore;
    use crate::config::Config;

    impl PgStore {
        pub(crate) fn pool(&self) -> &PgPool {
            &self.pool
        }
    }

    /// Connected and migrated store, `None` when `DATABASE_URL` is unset
    pub(crate) async fn store_from_env() -> Option<PgStore> {
        let url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty())?;
        let config = Config::from_vars(|name| (name == "DATABASE_URL").then(|| url.clone()))
            .expect("test config");
        Some(PgStore::connect(&config).await.expect("connect to DATABASE_URL"))
    }

    /// Short unique token for names that must not collide across tests
    pub(crate) fn unique() -> String {
        Uuid::new_v4().simple().to_string()[..12].to_string()
    }

    pub(crate) fn menu_item(name: &str, price: Decimal, category_id: Option<Uuid>) -> MenuItemCreate {
        MenuItemCreate {
            name: name.to_string(),
            description: Some("House recipe".into()),
            price,
            category_id,
            discount_price: None,
            image: None,
            rating: None,
            reviews: None,
            is_vegetarian: None,
            is_available: None,
            preparation_time: Some(15),
            tags: Some(vec!["house".into()]),
            badge: None,
            discount: None,
        }
    }

    /// Insert a row into the identity provider's users table
    pub(crate) async fn insert_user(pool: &PgPool, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let now = shared::util::now_millis();
        sqlx::query(
            "INSERT INTO users (id, name, email, phone, created_at, updated_at) VALUES ($1, $2, $3, NULL, $4, $4)",
        )
        .bind(id)
        .bind(name)
        .bind(format!("{}@example.com", unique()))
        .bind(now)
        .execute(pool)
        .await
        .expect("insert user");
        id
    }
}
