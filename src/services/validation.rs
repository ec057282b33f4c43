//! Field checks shared by the domain services.
//!
//! Each helper returns the cleaned value or a user-facing message; the
//! services wrap the message in their own `Validation` variant.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-]{6,20}$").expect("phone regex is valid"));

/// Trims the value and rejects it when empty or missing.
pub fn required(field: &str, value: Option<&str>) -> Result<String, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!("{field} is required")),
    }
}

/// Trims the value, mapping blank input to `None`.
#[must_use]
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{field} must be {max} characters or less"));
    }
    Ok(())
}

/// Lowercases and checks the address shape.
pub fn email(field: &str, value: &str) -> Result<String, String> {
    let normalized = value.trim().to_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(format!("{field} must be a valid email address"));
    }
    Ok(normalized)
}

pub fn phone(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if !PHONE_RE.is_match(trimmed) {
        return Err(format!("{field} must be a valid phone number"));
    }
    Ok(trimmed.to_string())
}

pub fn password(value: &str, min_length: usize) -> Result<(), String> {
    if value.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}
