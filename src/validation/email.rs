//! Email syntax check
//!
//! A structural `local@domain.tld` shape test. No DNS or mailbox verification.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_SHAPE is a valid regex pattern")
});

/// Returns true if `email` looks like `local@domain.tld`.
pub fn validate_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Returns the part of an email address before the first `@`.
pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or_default()
}
