//! Data models
//!
//! Shared between plate-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are UUIDs, all timestamps are Unix milliseconds.

pub mod category;
pub mod menu_item;
pub mod order;
pub mod reservation;
pub mod user;

// Re-exports
pub use category::*;
pub use menu_item::*;
pub use order::*;
pub use reservation::*;
pub use user::*;
