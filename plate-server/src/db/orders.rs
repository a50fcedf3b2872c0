//! Order database operations

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::models::{
    DeliveryAddress, FulfillmentType, MenuItem, Order, OrderDetail, OrderLineItem, OrderStats,
    OrderStatus, PaymentMethod, PaymentStatus, UserSummary,
};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::{OrderFilter, catalog};
use crate::error::ServiceResult;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    user_id: Uuid,
    status: OrderStatus,
    order_type: FulfillmentType,
    subtotal: Decimal,
    tax: Decimal,
    delivery_fee: Decimal,
    discount: Decimal,
    total: Decimal,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    delivery_address: Option<Json<DeliveryAddress>>,
    special_instructions: Option<String>,
    estimated_ready_at: i64,
    created_at: i64,
    updated_at: i64,
    // LEFT JOIN users
    user_name: Option<String>,
    user_email: Option<String>,
    user_phone: Option<String>,
}

impl OrderRow {
    fn into_parts(self) -> (Order, Option<UserSummary>) {
        let user = match (self.user_name, self.user_email) {
            (Some(name), Some(email)) => Some(UserSummary {
                id: self.user_id,
                name,
                email,
                phone: self.user_phone,
            }),
            _ => None,
        };
        let order = Order {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            status: self.status,
            order_type: self.order_type,
            subtotal: self.subtotal,
            tax: self.tax,
            delivery_fee: self.delivery_fee,
            discount: self.discount,
            total: self.total,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            delivery_address: self.delivery_address.map(|Json(addr)| addr),
            special_instructions: self.special_instructions,
            estimated_ready_at: self.estimated_ready_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (order, user)
    }
}

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.order_number, o.user_id, o.status, o.order_type,
           o.subtotal, o.tax, o.delivery_fee, o.discount, o.total,
           o.payment_method, o.payment_status, o.delivery_address, o.special_instructions,
           o.estimated_ready_at, o.created_at, o.updated_at,
           u.name AS user_name, u.email AS user_email, u.phone AS user_phone
    FROM orders o
    LEFT JOIN users u ON u.id = o.user_id
"#;

pub async fn insert(pool: &PgPool, order: &Order, items: &[OrderLineItem]) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, order_number, user_id, status, order_type,
            subtotal, tax, delivery_fee, discount, total,
            payment_method, payment_status, delivery_address, special_instructions,
            estimated_ready_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        "#,
    )
    .bind(order.id)
    .bind(&order.order_number)
    .bind(order.user_id)
    .bind(order.status)
    .bind(order.order_type)
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.delivery_fee)
    .bind(order.discount)
    .bind(order.total)
    .bind(order.payment_method)
    .bind(order.payment_status)
    .bind(order.delivery_address.as_ref().map(Json))
    .bind(&order.special_instructions)
    .bind(order.estimated_ready_at)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *tx)
    .await?;

    let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
    let order_ids: Vec<Uuid> = items.iter().map(|i| i.order_id).collect();
    let menu_item_ids: Vec<Uuid> = items.iter().map(|i| i.menu_item_id).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let prices: Vec<Decimal> = items.iter().map(|i| i.price).collect();
    let subtotals: Vec<Decimal> = items.iter().map(|i| i.subtotal).collect();
    let created: Vec<i64> = items.iter().map(|i| i.created_at).collect();

    sqlx::query(
        r#"
        INSERT INTO order_items (id, order_id, menu_item_id, quantity, price, subtotal, created_at, line_no)
        SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::uuid[], $4::int[], $5::numeric[], $6::numeric[], $7::bigint[])
            WITH ORDINALITY
        "#,
    )
    .bind(&ids)
    .bind(&order_ids)
    .bind(&menu_item_ids)
    .bind(&quantities)
    .bind(&prices)
    .bind(&subtotals)
    .bind(&created)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

async fn find(pool: &PgPool, id: Uuid) -> ServiceResult<Option<OrderDetail>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("{ORDER_SELECT} WHERE o.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let (order, _) = row.into_parts();
    let mut details = attach_items(pool, vec![(order, None)]).await?;
    Ok(details.pop())
}

pub async fn list(pool: &PgPool, filter: OrderFilter) -> ServiceResult<Vec<OrderDetail>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        r#"
        {ORDER_SELECT}
        WHERE ($1::order_status IS NULL OR o.status = $1)
          AND ($2::uuid IS NULL OR o.user_id = $2)
        ORDER BY o.created_at DESC, o.id
        "#
    ))
    .bind(filter.status)
    .bind(filter.user_id)
    .fetch_all(pool)
    .await?;

    let orders = rows
        .into_iter()
        .map(|row| {
            let (order, user) = row.into_parts();
            (order, user.filter(|_| filter.include_user))
        })
        .collect();
    attach_items(pool, orders).await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: OrderStatus,
    now: i64,
) -> ServiceResult<Option<OrderDetail>> {
    let result = sqlx::query("UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1")
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find(pool, id).await
}

pub async fn stats(pool: &PgPool) -> ServiceResult<OrderStats> {
    let stats = sqlx::query_as::<_, OrderStats>(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE status = 'confirmed') AS confirmed,
            COUNT(*) FILTER (WHERE status = 'cooking') AS cooking,
            COUNT(*) FILTER (WHERE status = 'ready') AS ready,
            COUNT(*) FILTER (WHERE status = 'out_for_delivery') AS out_for_delivery,
            COUNT(*) FILTER (WHERE status = 'delivered') AS delivered,
            COUNT(*) AS total
        FROM orders
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(stats)
}

/// Load line items for the given orders and expand each with its menu item
async fn attach_items(
    pool: &PgPool,
    orders: Vec<(Order, Option<UserSummary>)>,
) -> ServiceResult<Vec<OrderDetail>> {
    if orders.is_empty() {
        return Ok(vec![]);
    }
    let order_ids: Vec<Uuid> = orders.iter().map(|(o, _)| o.id).collect();

    let lines: Vec<OrderLineItem> = sqlx::query_as(
        r#"
        SELECT id, order_id, menu_item_id, quantity, price, subtotal, created_at
        FROM order_items
        WHERE order_id = ANY($1)
        ORDER BY line_no
        "#,
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let mut menu_item_ids: Vec<Uuid> = lines.iter().map(|l| l.menu_item_id).collect();
    menu_item_ids.sort_unstable();
    menu_item_ids.dedup();
    let menu_items: HashMap<Uuid, MenuItem> = catalog::find_many(pool, &menu_item_ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let mut lines_by_order: HashMap<Uuid, Vec<OrderLineItem>> = HashMap::new();
    for mut line in lines {
        line.menu_item = menu_items.get(&line.menu_item_id).cloned();
        lines_by_order.entry(line.order_id).or_default().push(line);
    }

    Ok(orders
        .into_iter()
        .map(|(order, user)| OrderDetail {
            items: lines_by_order.remove(&order.id).unwrap_or_default(),
            order,
            user,
        })
        .collect())
}
