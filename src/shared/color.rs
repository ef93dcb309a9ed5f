//! Hex colors and the default palette.
//!
//! Accepted forms are `#rgb`, `#rrggbb` and `#rrggbbaa`. Values are stored
//! trimmed and lowercased.

use crate::shared::error::BrandingError;

/// Fallback palette used whenever a backend has no usable color
pub mod palette {
    /// Page background
    pub const BACKGROUND: &str = "#ffffff";
    /// Body text
    pub const TEXT: &str = "#1f2937";
    /// Primary buttons
    pub const BUTTON: &str = "#2563eb";
    /// Cards
    pub const CARD: &str = "#f9fafb";
    /// Sidebar background
    pub const SIDEBAR_BACKGROUND: &str = "#111827";
    /// Sidebar text
    pub const SIDEBAR_TEXT: &str = "#f9fafb";
    /// Header background
    pub const HEADER_BACKGROUND: &str = "#ffffff";
    /// Header text
    pub const HEADER_TEXT: &str = "#111827";
}

/// Whether `value` is a valid hex color
pub fn is_hex_color(value: &str) -> bool {
    let value = value.trim();
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Validate and normalize a tenant-supplied color
pub fn parse_hex_color(field: &str, value: &str) -> Result<String, BrandingError> {
    if is_hex_color(value) {
        Ok(value.trim().to_ascii_lowercase())
    } else {
        Err(BrandingError::validation(
            field,
            format!("'{}' is not a hex color", value),
        ))
    }
}

/// Normalize a backend-supplied color, falling back to `default` when it is
/// missing, blank or unparsable.
pub fn color_or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if is_hex_color(v) => v.trim().to_ascii_lowercase(),
        Some(v) if !v.trim().is_empty() => {
            tracing::debug!("Ignoring invalid color '{}', using {}", v, default);
            default.to_string()
        }
        _ => default.to_string(),
    }
}
