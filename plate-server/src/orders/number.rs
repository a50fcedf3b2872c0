//! Order number generation

use rand::Rng;

/// `ORD-<millis>-<0..999>`
///
/// Uniqueness is not checked here; the unique index on `orders.order_number`
/// rejects the rare collision.
pub fn generate_order_number(now_millis: i64) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("ORD-{now_millis}-{suffix}")
}
