//! Common input normalisation.

/// Canonical form of an email address used for identity lookups.
///
/// Emails are compared case-insensitively across the whole system, so every
/// write and every lookup goes through this function.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Treats `None`, empty and whitespace-only strings alike.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// Trims an optional string and drops it when nothing is left.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
