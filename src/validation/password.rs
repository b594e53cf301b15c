//! Password strength policy
//!
//! Rules are evaluated in a fixed order. Every failing rule is reported in
//! `PasswordCheck::violations`; the first one becomes the display message.

use serde::Deserialize;
use std::fmt;

use super::email::local_part;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Identity details a password must not contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserInfo {
    /// Lower-cased fragments to look for: both names and the email local part.
    fn fragments(&self) -> Vec<String> {
        [
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref().map(local_part),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
    }
}

/// A single failed password rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordViolation {
    Required,
    TooShort { min: usize, actual: usize },
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSpecialChar,
    ContainsWhitespace,
    ContainsIdentity,
}

impl fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordViolation::Required => write!(f, "Password is required"),
            PasswordViolation::TooShort { min, .. } => {
                write!(f, "Password must be at least {} characters", min)
            }
            PasswordViolation::MissingUppercase => write!(f, "Include at least one uppercase letter"),
            PasswordViolation::MissingLowercase => write!(f, "Include at least one lowercase letter"),
            PasswordViolation::MissingDigit => write!(f, "Include at least one number"),
            PasswordViolation::MissingSpecialChar => {
                write!(f, "Include at least one special character")
            }
            PasswordViolation::ContainsWhitespace => write!(f, "Password cannot contain spaces"),
            PasswordViolation::ContainsIdentity => {
                write!(f, "Password cannot contain your name or part of your email")
            }
        }
    }
}

/// Outcome of a password check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    pub is_valid: bool,
    /// Text of the first violation; `None` when the password is valid.
    pub message: Option<String>,
    pub violations: Vec<PasswordViolation>,
}

impl PasswordCheck {
    fn from_violations(violations: Vec<PasswordViolation>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            message: violations.first().map(ToString::to_string),
            violations,
        }
    }
}

/// Tunable password rules
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordPolicy {
    /// Minimum length in characters
    pub min_length: usize,

    /// Names and email local parts shorter than this are not checked
    pub min_identity_fragment: usize,

    pub reject_whitespace: bool,

    /// Report an empty password as missing instead of running the rules
    pub require_presence: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_identity_fragment: 3,
            reject_whitespace: false,
            require_presence: false,
        }
    }
}

impl PasswordPolicy {
    /// The six core rules plus the signup form's presence and whitespace checks.
    pub fn strict() -> Self {
        Self {
            reject_whitespace: true,
            require_presence: true,
            ..Self::default()
        }
    }

    /// Checks `password` against this policy and the optional identity details.
    pub fn check(&self, password: &str, user_info: Option<&UserInfo>) -> PasswordCheck {
        if self.require_presence && password.is_empty() {
            return PasswordCheck::from_violations(vec![PasswordViolation::Required]);
        }

        let mut violations = Vec::new();
        let len = password.chars().count();

        if len < self.min_length {
            violations.push(PasswordViolation::TooShort {
                min: self.min_length,
                actual: len,
            });
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push(PasswordViolation::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            violations.push(PasswordViolation::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PasswordViolation::MissingDigit);
        }
        if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            violations.push(PasswordViolation::MissingSpecialChar);
        }
        if self.reject_whitespace && password.chars().any(char::is_whitespace) {
            violations.push(PasswordViolation::ContainsWhitespace);
        }
        if let Some(info) = user_info {
            if self.contains_identity(password, info) {
                violations.push(PasswordViolation::ContainsIdentity);
            }
        }

        PasswordCheck::from_violations(violations)
    }

    fn contains_identity(&self, password: &str, info: &UserInfo) -> bool {
        let lowered = password.to_lowercase();
        info.fragments()
            .iter()
            .filter(|f| f.chars().count() >= self.min_identity_fragment)
            .any(|f| lowered.contains(f.as_str()))
    }
}

/// Checks `password` against the six core rules only.
pub fn validate_password(password: &str, user_info: Option<&UserInfo>) -> PasswordCheck {
    PasswordPolicy::default().check(password, user_info)
}
