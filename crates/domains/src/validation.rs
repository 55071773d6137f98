//! Payload-level checks shared by entities and orchestrators.

use crate::errors::{DomainError, Result};

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_LABEL_NAME_LEN: usize = 50;

/// Trims `title` and enforces `1..=MAX_TITLE_LEN` characters.
pub fn title(field: &str, title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn label_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Label name is required"));
    }
    if trimmed.chars().count() > MAX_LABEL_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Label name must be at most {MAX_LABEL_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Accepts `#RRGGBB` in any case and returns it uppercased.
pub fn hex_color(color: &str) -> Result<String> {
    let color = color.trim();
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(DomainError::validation(
            "Color must be a hex value in the form #RRGGBB",
        ));
    }
    Ok(color.to_ascii_uppercase())
}

/// Positions may be negative, fractional or huge, but never NaN or infinite.
pub fn position(position: f64) -> Result<f64> {
    if !position.is_finite() {
        return Err(DomainError::validation("Position must be a finite number"));
    }
    Ok(position)
}

/// Empty strings collapse to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
