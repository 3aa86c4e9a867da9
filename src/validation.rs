use crate::error::AppError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Accepts `#RRGGBB` only, the shape the color picker produces.
pub fn require_hex_color(value: &str) -> Result<(), AppError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::Validation(format!(
            "Ink color must be a hex value like #1A2B3C, got {value:?}"
        )));
    }
    Ok(())
}
