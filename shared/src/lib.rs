//! Shared types for the Plate ordering backend
//!
//! Domain models, request payloads and the unified error system used by
//! `plate-server` and by any client that talks to it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
