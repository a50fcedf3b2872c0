//! Bearer-token authentication

pub mod jwt;
pub mod middleware;

pub use jwt::{CurrentUser, JwtService};
pub use middleware::{require_admin, require_auth};
