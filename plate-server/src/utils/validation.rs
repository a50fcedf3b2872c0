//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use shared::error::{AppError, ErrorCode};
use uuid::Uuid;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item, category
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, special instructions and requests
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: badge, zip code, tags
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Address lines
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that a number lies within an inclusive range.
pub fn validate_range<T>(value: T, field: &str, min: T, max: T) -> Result<(), AppError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be between {min} and {max}, got {value}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Parse a client-supplied identifier.
///
/// The value is trimmed and lowercased, then must be the 36-character
/// hyphenated form (8-4-4-4-12 hex digits).
pub fn parse_identifier(raw: &str) -> Result<Uuid, AppError> {
    let normalized = raw.trim().to_ascii_lowercase();
    let invalid = || {
        AppError::with_message(ErrorCode::InvalidFormat, format!("Invalid ID format: {raw}"))
            .with_detail("id", raw)
    };

    let groups: Vec<&str> = normalized.split('-').collect();
    let shape_ok = groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.bytes().all(|b| b.is_ascii_hexdigit()));
    if !shape_ok {
        return Err(invalid());
    }
    Uuid::parse_str(&normalized).map_err(|_| invalid())
}
