//! Money calculation for order totals
//!
//! All arithmetic is done with `Decimal`; nothing passes through `f64`.

use rust_decimal::prelude::*;
use shared::models::FulfillmentType;

/// Rounding for monetary values (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// Sales tax applied to the subtotal (10%)
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Flat fee for delivery orders (5.00)
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

/// Zero carried at money scale so it serializes as "0.00", like a stored column
pub const ZERO_AMOUNT: Decimal = Decimal::from_parts(0, 0, 0, false, 2);

/// Largest value a `NUMERIC(10,2)` money column holds (99999999.99)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Header amounts of a new order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Round half away from zero to 2 decimal places
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `price * quantity` for one line
pub fn line_subtotal(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Compute tax, fee and total from the summed line subtotals
pub fn compute_totals(subtotal: Decimal, order_type: FulfillmentType) -> OrderTotals {
    let tax = round_money(subtotal * TAX_RATE);
    let delivery_fee = if order_type.is_delivery() {
        DELIVERY_FEE
    } else {
        ZERO_AMOUNT
    };
    // No discount source exists yet; the column is kept for the total formula
    let discount = ZERO_AMOUNT;

    OrderTotals {
        subtotal,
        tax,
        delivery_fee,
        discount,
        total: subtotal + tax + delivery_fee - discount,
    }
}
