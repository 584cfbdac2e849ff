//! Input validation helpers
//!
//! Centralized text length constants and validation predicates used by the
//! CRUD handlers and repositories. SQLite TEXT has no built-in length
//! enforcement, so limits live here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: subscription, site, task title, username
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, ledger labels
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
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
        )));
    }
    Ok(())
}

/// Validate a quantity that must be strictly positive.
pub fn validate_positive_quantity(value: i64, field: &str) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::validation(format!("{field} must be positive")));
    }
    Ok(())
}

/// Validate an ISO weekday index (0 = Monday .. 6 = Sunday).
pub fn validate_weekday(value: i64) -> Result<(), AppError> {
    if !(0..=6).contains(&value) {
        return Err(AppError::validation(format!(
            "weekday must be between 0 (Monday) and 6 (Sunday), got {value}"
        )));
    }
    Ok(())
}

/// Validate a login PIN: exactly 4 ASCII digits.
pub fn validate_pin(pin: &str) -> Result<(), AppError> {
    if pin.len() != 4 || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("PIN must be exactly 4 digits".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_whitespace() {
        assert!(validate_required_text("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Mobile 1", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn weekday_range_is_inclusive() {
        assert!(validate_weekday(0).is_ok());
        assert!(validate_weekday(6).is_ok());
        assert!(validate_weekday(-1).is_err());
        assert!(validate_weekday(7).is_err());
    }

    #[test]
    fn pin_must_be_four_digits() {
        assert!(validate_pin("0000").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("12345").is_err());
        assert!(validate_pin("12a4").is_err());
    }
}
