//! Order workflow: validation, pricing and persistence of customer orders

pub mod number;
pub mod pricing;
pub mod workflow;

pub use workflow::{
    create_order, list_orders, list_user_orders, order_stats, parse_status_filter,
    update_order_status,
};
