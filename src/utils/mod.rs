//! Utility modules for the access core
//!
//! - **error**: error taxonomy and result alias
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"#)
        .expect("email pattern is a valid regex")
});

/// Check if a string is a valid email
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Normalize an email for identity lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Mask a secret for terminal output, keeping the first two characters
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    format!("{}{}", visible, "*".repeat(secret.chars().count().saturating_sub(2).max(4)))
}
