//! Input validation and normalization
//!
//! Stateless checks used by registration and profile forms. Every function is
//! total over its input and safe to call from any number of tasks at once.

pub mod age;
pub mod email;
pub mod password;
pub mod phone;
pub mod sanitize;

pub use age::{is_at_least_age, parse_dob, parse_dob_entry};
pub use email::validate_email;
pub use password::{PasswordCheck, PasswordPolicy, PasswordViolation, UserInfo, validate_password};
pub use phone::normalize_phone_number;
pub use sanitize::sanitize_string;
