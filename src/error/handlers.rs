//! Error handlers
//!
//! Maps service errors onto log output and protocol reply codes.

use crate::error::types::{ServiceError, SessionError};
use crate::protocol::responses;
use log::error;

/// Handle a service error
pub fn handle_error(err: &ServiceError) {
    error!("Validation service error: {}", err);
}

/// Convert error to a protocol reply code
pub fn error_to_reply_code(err: &ServiceError) -> u16 {
    match err {
        ServiceError::Validation(_) => responses::SYNTAX_ERROR_IN_ARGUMENT,
        ServiceError::Session(SessionError::LineTooLong(_)) => responses::SYNTAX_ERROR,
        ServiceError::Session(_) => responses::SERVICE_UNAVAILABLE,
        ServiceError::Config(_) => responses::SERVICE_UNAVAILABLE,
        ServiceError::IoError(_) => responses::SERVICE_UNAVAILABLE,
    }
}

/// Format an error as a full protocol reply line
pub fn error_reply(err: &ServiceError) -> String {
    let text = match err {
        ServiceError::Validation(e) => e.to_string(),
        ServiceError::Session(SessionError::LineTooLong(_)) => "Line too long".to_string(),
        ServiceError::Session(SessionError::RateLimited(_)) => "Rate limit exceeded".to_string(),
        ServiceError::Session(SessionError::TooManyClients(_)) => {
            "Too many connections. Try again later.".to_string()
        }
        ServiceError::Config(_) | ServiceError::IoError(_) => "Service unavailable".to_string(),
    };
    responses::format_response(error_to_reply_code(err), &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_session_errors_map_to_codes() {
        let too_long = ServiceError::from(SessionError::LineTooLong(4096));
        assert_eq!(error_to_reply_code(&too_long), 500);
        assert_eq!(error_reply(&too_long), "500 Line too long\r\n");

        let limited = ServiceError::from(SessionError::RateLimited(
            "127.0.0.1:9000".parse().unwrap(),
        ));
        assert_eq!(error_reply(&limited), "421 Rate limit exceeded\r\n");
    }

    #[test]
    fn test_validation_error_reply() {
        let err = ServiceError::from(ValidationError::InvalidDate("31/02/2001".into()));
        assert_eq!(error_reply(&err), "501 Invalid date: 31/02/2001\r\n");
    }
}
