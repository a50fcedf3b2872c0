//! Order creation, listing and status transitions

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    MenuItem, Order, OrderCreate, OrderDetail, OrderItemInput, OrderLineItem, OrderStats,
    OrderStatus, PaymentStatus,
};
use shared::util::now_millis;
use uuid::Uuid;

use super::number::generate_order_number;
use super::pricing::{MAX_AMOUNT, compute_totals, line_subtotal};
use crate::db::{OrderFilter, Store};
use crate::error::ServiceResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, parse_identifier, validate_optional_text,
    validate_range, validate_required_text,
};

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i64 = 9999;

/// Time until an order is expected to be ready, whatever its type
pub const ESTIMATED_READY_MS: i64 = 45 * 60 * 1000;

/// A requested line that passed validation
struct ValidatedLine {
    item: MenuItem,
    quantity: i32,
    subtotal: Decimal,
}

fn validate_payload(req: &OrderCreate) -> Result<(), AppError> {
    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    validate_optional_text(&req.special_instructions, "special_instructions", MAX_NOTE_LEN)?;
    if let Some(addr) = &req.delivery_address {
        validate_required_text(&addr.street, "delivery_address.street", MAX_ADDRESS_LEN)?;
        validate_required_text(&addr.city, "delivery_address.city", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&addr.state, "delivery_address.state", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&addr.zip_code, "delivery_address.zip_code", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&addr.country, "delivery_address.country", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&addr.landmark, "delivery_address.landmark", MAX_ADDRESS_LEN)?;
    }
    Ok(())
}

fn validate_quantity(quantity: i64) -> Result<i32, AppError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("quantity must be between 1 and {MAX_QUANTITY}, got {quantity}"),
        )
        .with_detail("quantity", quantity));
    }
    i32::try_from(quantity).map_err(|_| AppError::new(ErrorCode::InvalidQuantity))
}

/// Validate one requested line against the catalog
///
/// Checks run in a fixed order: identifier format, quantity, existence, availability.
async fn validate_line(
    store: &dyn Store,
    line: &OrderItemInput,
    seen: &mut HashMap<Uuid, Option<MenuItem>>,
) -> ServiceResult<ValidatedLine> {
    let id = parse_identifier(&line.menu_item_id)?;
    let quantity = validate_quantity(line.quantity)?;

    let item = match seen.get(&id) {
        Some(cached) => cached.clone(),
        None => {
            let found = store.find_menu_item(id).await?;
            seen.insert(id, found.clone());
            found
        }
    };

    let item = item.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::MenuItemNotFound,
            format!("Menu item with ID {id} not found"),
        )
        .with_detail("menu_item_id", id.to_string())
    })?;

    if !item.is_available {
        return Err(AppError::with_message(
            ErrorCode::MenuItemUnavailable,
            format!("{} is currently unavailable", item.name),
        )
        .with_detail("menu_item_id", id.to_string())
        .with_detail("name", item.name.clone())
        .into());
    }

    Ok(ValidatedLine {
        subtotal: line_subtotal(item.price, quantity),
        item,
        quantity,
    })
}

/// Create an order for `user_id`
///
/// Every line is validated before anything is written; header and lines are
/// then persisted in one transaction.
pub async fn create_order(
    store: &dyn Store,
    user_id: Uuid,
    req: OrderCreate,
) -> ServiceResult<OrderDetail> {
    validate_payload(&req)?;

    let mut seen = HashMap::new();
    let mut lines = Vec::with_capacity(req.items.len());
    for requested in &req.items {
        lines.push(validate_line(store, requested, &mut seen).await?);
    }

    let subtotal: Decimal = lines.iter().map(|l| l.subtotal).sum();
    let totals = compute_totals(subtotal, req.order_type);
    // Line subtotals, subtotal and tax are all bounded by the total
    validate_range(totals.total, "total", Decimal::ZERO, MAX_AMOUNT)?;
    let now = now_millis();

    let order = Order {
        id: Uuid::new_v4(),
        order_number: generate_order_number(now),
        user_id,
        status: OrderStatus::Pending,
        order_type: req.order_type,
        subtotal: totals.subtotal,
        tax: totals.tax,
        delivery_fee: totals.delivery_fee,
        discount: totals.discount,
        total: totals.total,
        payment_method: req.payment_method,
        payment_status: PaymentStatus::Pending,
        delivery_address: req.delivery_address,
        special_instructions: req.special_instructions,
        estimated_ready_at: now + ESTIMATED_READY_MS,
        created_at: now,
        updated_at: now,
    };

    let items: Vec<OrderLineItem> = lines
        .into_iter()
        .map(|line| OrderLineItem {
            id: Uuid::new_v4(),
            order_id: order.id,
            menu_item_id: line.item.id,
            quantity: line.quantity,
            price: line.item.price,
            subtotal: line.subtotal,
            created_at: now,
            menu_item: Some(line.item),
        })
        .collect();

    store.insert_order(&order, &items).await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        user_id = %user_id,
        lines = items.len(),
        total = %order.total,
        "Order created"
    );

    Ok(OrderDetail {
        order,
        items,
        user: None,
    })
}

/// Parse the `?status=` filter of the admin listing
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<OrderStatus>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse::<OrderStatus>().map(Some).map_err(|e| {
            AppError::with_message(ErrorCode::InvalidOrderStatus, e.to_string())
                .with_detail("status", s)
        }),
    }
}

/// All orders (admin), newest first, with owner summaries
pub async fn list_orders(
    store: &dyn Store,
    status: Option<OrderStatus>,
) -> ServiceResult<Vec<OrderDetail>> {
    store
        .list_orders(OrderFilter {
            status,
            user_id: None,
            include_user: true,
        })
        .await
}

/// The caller's own orders, newest first
pub async fn list_user_orders(store: &dyn Store, user_id: Uuid) -> ServiceResult<Vec<OrderDetail>> {
    store
        .list_orders(OrderFilter {
            status: None,
            user_id: Some(user_id),
            include_user: false,
        })
        .await
}

/// Overwrite the status of an order
///
/// Any status may follow any other; setting the current status again is a no-op
/// apart from `updated_at`.
pub async fn update_order_status(
    store: &dyn Store,
    id: Uuid,
    status: OrderStatus,
) -> ServiceResult<OrderDetail> {
    let detail = store
        .update_order_status(id, status, now_millis())
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
                .with_detail("order_id", id.to_string())
        })?;

    tracing::info!(order_id = %id, status = %status, "Order status updated");
    Ok(detail)
}

pub async fn order_stats(store: &dyn Store) -> ServiceResult<OrderStats> {
    store.order_stats().await
}
