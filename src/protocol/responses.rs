//! Protocol response handling
//!
//! Defines reply codes and formatting.

/// Reply codes
pub const OK: u16 = 200;
pub const READY: u16 = 220;
pub const CLOSING: u16 = 221;
pub const ACCEPTED: u16 = 250;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const SYNTAX_ERROR: u16 = 500;
pub const SYNTAX_ERROR_IN_ARGUMENT: u16 = 501;
pub const INVALID_EMAIL: u16 = 551;
pub const WEAK_PASSWORD: u16 = 552;
pub const AGE_NOT_MET: u16 = 553;

/// Format a reply line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}
