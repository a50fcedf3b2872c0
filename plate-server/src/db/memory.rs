//! In-memory store for workflow and router tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, CategoryCreate, CategorySummary, CategoryUpdate, MenuItem, MenuItemCreate,
    MenuItemQuery, MenuItemUpdate, Order, OrderDetail, OrderLineItem, OrderStats, OrderStatus,
    Reservation, ReservationCreate, ReservationStatus, ReservationUpdate, UserSummary,
};
use uuid::Uuid;

use super::{CatalogStore, OrderFilter, OrderStore, ReservationStore, Store};
use crate::error::{BoxError, ServiceResult};

#[derive(Default)]
struct Data {
    users: HashMap<Uuid, UserSummary>,
    categories: Vec<Category>,
    menu_items: Vec<MenuItem>,
    orders: Vec<Order>,
    order_items: Vec<OrderLineItem>,
    reservations: Vec<Reservation>,
}

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Data>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail like a lost connection
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn add_user(&self, user: UserSummary) {
        self.data.lock().unwrap().users.insert(user.id, user);
    }

    /// Insert a menu item directly, bypassing payload validation
    pub fn add_menu_item(&self, name: &str, price: Decimal, is_available: bool) -> MenuItem {
        let now = shared::util::now_millis();
        let item = MenuItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price,
            category_id: None,
            discount_price: None,
            image: None,
            rating: Decimal::ZERO,
            reviews: 0,
            is_vegetarian: false,
            is_available,
            preparation_time: None,
            tags: vec![],
            badge: None,
            discount: None,
            created_at: now,
            updated_at: now,
            category: None,
        };
        self.data.lock().unwrap().menu_items.push(item.clone());
        item
    }

    pub fn order_count(&self) -> usize {
        self.data.lock().unwrap().orders.len()
    }

    pub fn order_item_count(&self) -> usize {
        self.data.lock().unwrap().order_items.len()
    }

    fn check_online(&self) -> ServiceResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BoxError::from("connection refused").into());
        }
        Ok(())
    }
}

impl Data {
    fn expand(&self, mut item: MenuItem) -> MenuItem {
        item.category = item.category_id.and_then(|id| {
            self.categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| CategorySummary {
                    id: c.id,
                    name: c.name.clone(),
                })
        });
        item
    }

    fn menu_item(&self, id: Uuid) -> Option<MenuItem> {
        self.menu_items
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .map(|m| self.expand(m))
    }

    fn ensure_category(&self, id: Option<Uuid>) -> ServiceResult<()> {
        match id {
            Some(id) if !self.categories.iter().any(|c| c.id == id) => {
                Err(AppError::with_message(
                    ErrorCode::CategoryNotFound,
                    format!("Category with ID {id} not found"),
                )
                .with_detail("category_id", id.to_string())
                .into())
            }
            _ => Ok(()),
        }
    }

    fn ensure_unique_name(&self, name: &str, is_active: bool, except: Option<Uuid>) -> ServiceResult<()> {
        let taken = is_active
            && self.categories.iter().any(|c| {
                c.is_active && Some(c.id) != except && c.name.to_lowercase() == name.to_lowercase()
            });
        if taken {
            return Err(AppError::with_message(
                ErrorCode::CategoryNameExists,
                format!("Category '{name}' already exists"),
            )
            .with_detail("name", name)
            .into());
        }
        Ok(())
    }

    fn detail(&self, order: &Order, include_user: bool) -> OrderDetail {
        let items = self
            .order_items
            .iter()
            .filter(|l| l.order_id == order.id)
            .cloned()
            .map(|mut l| {
                l.menu_item = self.menu_item(l.menu_item_id);
                l
            })
            .collect();
        OrderDetail {
            order: order.clone(),
            items,
            user: if include_user {
                self.users.get(&order.user_id).cloned()
            } else {
                None
            },
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        self.check_online()?;
        let data = self.data.lock().unwrap();
        let mut categories: Vec<Category> =
            data.categories.iter().filter(|c| c.is_active).cloned().collect();
        categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    async fn create_category(&self, data: &CategoryCreate, now: i64) -> ServiceResult<Category> {
        self.check_online()?;
        let mut store = self.data.lock().unwrap();
        let is_active = data.is_active.unwrap_or(true);
        store.ensure_unique_name(&data.name, is_active, None)?;
        let category = Category {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            description: data.description.clone(),
            image: data.image.clone(),
            sort_order: data.sort_order.unwrap_or(0),
            is_active,
            created_at: now,
            updated_at: now,
        };
        store.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        data: &CategoryUpdate,
        now: i64,
    ) -> ServiceResult<Option<Category>> {
        self.check_online()?;
        let mut store = self.data.lock().unwrap();
        let Some(current) = store.categories.iter().find(|c| c.id == id).cloned() else {
            return Ok(None);
        };
        let name = data.name.clone().unwrap_or(current.name.clone());
        let is_active = data.is_active.unwrap_or(current.is_active);
        store.ensure_unique_name(&name, is_active, Some(id))?;

        let Some(category) = store.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = name;
        category.is_active = is_active;
        if let Some(description) = &data.description {
            category.description = Some(description.clone());
        }
        if let Some(image) = &data.image {
            category.image = Some(image.clone());
        }
        if let Some(sort_order) = data.sort_order {
            category.sort_order = sort_order;
        }
        category.updated_at = now;
        Ok(Some(category.clone()))
    }

    async fn list_menu_items(&self, query: &MenuItemQuery) -> ServiceResult<Vec<MenuItem>> {
        self.check_online()?;
        let data = self.data.lock().unwrap();
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let mut items: Vec<MenuItem> = data
            .menu_items
            .iter()
            .filter(|m| query.category.is_none() || m.category_id == query.category)
            .filter(|m| {
                search
                    .as_deref()
                    .is_none_or(|s| m.name.to_lowercase().contains(s))
            })
            .cloned()
            .map(|m| data.expand(m))
            .collect();
        // Newest first; insertion order breaks ties between equal timestamps
        items.reverse();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn find_menu_item(&self, id: Uuid) -> ServiceResult<Option<MenuItem>> {
        self.check_online()?;
        Ok(self.data.lock().unwrap().menu_item(id))
    }

    async fn create_menu_item(&self, data: &MenuItemCreate, now: i64) -> ServiceResult<MenuItem> {
        self.check_online()?;
        let mut store = self.data.lock().unwrap();
        store.ensure_category(data.category_id)?;
        let item = MenuItem {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            description: data.description.clone(),
            price: data.price,
            category_id: data.category_id,
            discount_price: data.discount_price,
            image: data.image.clone(),
            rating: data.rating.unwrap_or_default(),
            reviews: data.reviews.unwrap_or(0),
            is_vegetarian: data.is_vegetarian.unwrap_or(false),
            is_available: data.is_available.unwrap_or(true),
            preparation_time: data.preparation_time,
            tags: data.tags.clone().unwrap_or_default(),
            badge: data.badge.clone(),
            discount: data.discount,
            created_at: now,
            updated_at: now,
            category: None,
        };
        store.menu_items.push(item.clone());
        Ok(store.expand(item))
    }

    async fn update_menu_item(
        &self,
        id: Uuid,
        data: &MenuItemUpdate,
        now: i64,
    ) -> ServiceResult<Option<MenuItem>> {
        self.check_online()?;
        let mut store = self.data.lock().unwrap();
        store.ensure_category(data.category_id)?;
        let Some(item) = store.menu_items.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &data.name {
            item.name = v.clone();
        }
        if let Some(v) = &data.description {
            item.description = Some(v.clone());
        }
        if let Some(v) = data.price {
            item.price = v;
        }
        if let Some(v) = data.category_id {
            item.category_id = Some(v);
        }
        if let Some(v) = data.discount_price {
            item.discount_price = Some(v);
        }
        if let Some(v) = &data.image {
            item.image = Some(v.clone());
        }
        if let Some(v) = data.rating {
            item.rating = v;
        }
        if let Some(v) = data.reviews {
            item.reviews = v;
        }
        if let Some(v) = data.is_vegetarian {
            item.is_vegetarian = v;
        }
        if let Some(v) = data.is_available {
            item.is_available = v;
        }
        if let Some(v) = data.preparation_time {
            item.preparation_time = Some(v);
        }
        if let Some(v) = &data.tags {
            item.tags = v.clone();
        }
        if let Some(v) = &data.badge {
            item.badge = Some(v.clone());
        }
        if let Some(v) = data.discount {
            item.discount = Some(v);
        }
        item.updated_at = now;
        let item = item.clone();
        Ok(Some(store.expand(item)))
    }

    async fn delete_menu_item(&self, id: Uuid) -> ServiceResult<bool> {
        self.check_online()?;
        let mut store = self.data.lock().unwrap();
        let before = store.menu_items.len();
        store.menu_items.retain(|m| m.id != id);
        Ok(store.menu_items.len() != before)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: &Order, items: &[OrderLineItem]) -> ServiceResult<()> {
        self.check_online()?;
        let mut store = self.data.lock().unwrap();
        if store.orders.iter().any(|o| o.order_number == order.order_number) {
            return Err(BoxError::from("duplicate key value violates unique constraint").into());
        }
        store.orders.push(order.clone());
        store.order_items.extend(items.iter().cloned().map(|mut l| {
            l.menu_item = None;
            l
        }));
        Ok(())
    }

    async fn list_orders(&self, filter: OrderFilter) -> ServiceResult<Vec<OrderDetail>> {
        self.check_online()?;
        let store = self.data.lock().unwrap();
        let mut orders: Vec<OrderDetail> = store
            .orders
            .iter()
            .rev()
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .filter(|o| filter.user_id.is_none_or(|u| o.user_id == u))
            .map(|o| store.detail(o, filter.include_user))
            .collect();
        orders.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        now: i64,
    ) -> ServiceResult<Option<OrderDetail>> {
        self.check_online()?;
        let mut store = self.data.lock().unwrap();
        let Some(order) = store.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.status = status;
        order.updated_at = now;
        let order = order.clone();
        Ok(Some(store.detail(&order, false)))
    }

    async fn order_stats(&self) -> ServiceResult<OrderStats> {
        self.check_online()?;
        let store = self.data.lock().unwrap();
        let count = |status: OrderStatus| {
            store.orders.iter().filter(|o| o.status == status).count() as i64
        };
        Ok(OrderStats {
            confirmed: count(OrderStatus::Confirmed),
            cooking: count(OrderStatus::Cooking),
            ready: count(OrderStatus::Ready),
            out_for_delivery: count(OrderStatus::OutForDelivery),
            delivered: count(OrderStatus::Delivered),
            total: store.orders.len() as i64,
        })
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn create_reservation(
        &self,
        user_id: Uuid,
        data: &ReservationCreate,
        now: i64,
    ) -> ServiceResult<Reservation> {
        self.check_online()?;
        let reservation = Reservation {
            id: Uuid::new_v4(),
            user_id,
            date: data.date,
            time: data.time,
            party_size: data.party_size,
            special_requests: data.special_requests.clone(),
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
            user: None,
        };
        self.data
            .lock()
            .unwrap()
            .reservations
            .push(reservation.clone());
        Ok(reservation)
    }

    async fn list_reservations(&self, user_id: Option<Uuid>) -> ServiceResult<Vec<Reservation>> {
        self.check_online()?;
        let store = self.data.lock().unwrap();
        let mut reservations: Vec<Reservation> = store
            .reservations
            .iter()
            .filter(|r| user_id.is_none_or(|u| r.user_id == u))
            .cloned()
            .map(|mut r| {
                if user_id.is_none() {
                    r.user = store.users.get(&r.user_id).cloned();
                }
                r
            })
            .collect();
        reservations.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
        Ok(reservations)
    }

    async fn update_reservation(
        &self,
        id: Uuid,
        data: &ReservationUpdate,
        now: i64,
    ) -> ServiceResult<Option<Reservation>> {
        self.check_online()?;
        let mut store = self.data.lock().unwrap();
        let Some(r) = store.reservations.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(v) = data.date {
            r.date = v;
        }
        if let Some(v) = data.time {
            r.time = v;
        }
        if let Some(v) = data.party_size {
            r.party_size = v;
        }
        if let Some(v) = &data.special_requests {
            r.special_requests = Some(v.clone());
        }
        if let Some(v) = data.status {
            r.status = v;
        }
        r.updated_at = now;
        Ok(Some(r.clone()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> ServiceResult<()> {
        self.check_online()
    }
}
