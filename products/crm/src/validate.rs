//! Field checks applied before any write reaches the database.

use crate::error::{CrmError, CrmResult};

pub(crate) const MAX_TITLE: usize = 300;
pub(crate) const MAX_NAME: usize = 256;
pub(crate) const MAX_EMAIL: usize = 320;
pub(crate) const MAX_SHORT_TEXT: usize = 512;
pub(crate) const MAX_PHONE: usize = 64;
pub(crate) const MAX_ROLE: usize = 128;

pub(crate) fn required_text(field: &str, value: &str, max: usize) -> CrmResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CrmError::validation(format!("{field} is required")));
    }
    validate_length(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

pub(crate) fn optional_text(field: &str, value: Option<String>, max: usize) -> CrmResult<Option<String>> {
    if let Some(ref text) = value {
        validate_length(field, text, max)?;
    }
    Ok(value)
}

pub(crate) fn validate_length(field: &str, value: &str, max: usize) -> CrmResult<()> {
    if value.chars().count() > max {
        return Err(CrmError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn deal_value(value: f64) -> CrmResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CrmError::validation("value must be a non-negative number"));
    }
    Ok(value)
}

pub(crate) fn probability(value: i32) -> CrmResult<i32> {
    if !(0..=100).contains(&value) {
        return Err(CrmError::validation("probability must be between 0 and 100"));
    }
    Ok(value)
}

pub(crate) fn value_bound(field: &str, value: Option<f64>) -> CrmResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(CrmError::validation(format!(
            "{field} must be a non-negative number"
        ))),
        other => Ok(other),
    }
}

/// Lower-cases and checks the overall `local@domain.tld` shape.
pub(crate) fn email(value: Option<String>) -> CrmResult<Option<String>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let normalized = raw.trim().to_lowercase();
    validate_length("email", &normalized, MAX_EMAIL)?;
    let valid = match normalized.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !normalized.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(CrmError::validation("Invalid email address"));
    }
    Ok(Some(normalized))
}

/// Trimmed search term, or `None` when blank.
pub(crate) fn search_term(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}
