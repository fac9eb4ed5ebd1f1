//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::models::IdInput;

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: party, quality, username
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, remarks
pub const MAX_NOTE_LEN: usize = 1000;

/// Short identifiers: PO number, style number, phone, sample number
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Images per line item
pub const MAX_IMAGES_PER_ITEM: usize = 20;

/// Line items per order
pub const MAX_ITEMS_PER_ORDER: usize = 200;

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
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
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
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Parse a client-supplied id, malformed → `error_code`
pub fn parse_id(input: &IdInput, field: &str, error_code: ErrorCode) -> Result<i64, AppError> {
    input.parse().ok_or_else(|| {
        AppError::with_message(error_code, format!("Invalid {field}: {input:?}"))
            .with_detail("field", field)
    })
}

/// Parse a path segment id
pub fn parse_path_id(raw: &str, field: &str) -> Result<i64, AppError> {
    parse_id(&IdInput::Text(raw.to_string()), field, ErrorCode::InvalidRequest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Acme", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_required_text(&long, "name", MAX_NAME_LEN).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "remarks", 10).is_ok());
        assert!(validate_optional_text(&Some("short".into()), "remarks", 10).is_ok());
        assert!(validate_optional_text(&Some("much too long".into()), "remarks", 10).is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(&IdInput::Number(3), "party", ErrorCode::InvalidPartyId).unwrap(), 3);
        let err = parse_id(&IdInput::Text("zz".into()), "party", ErrorCode::InvalidPartyId).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPartyId);
        assert!(parse_path_id("abc", "id").is_err());
        assert_eq!(parse_path_id("42", "id").unwrap(), 42);
    }
}
