//! Error types
//!
//! Defines domain-specific error types for validation and for the service.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Validation module errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidDate(String),
    IncompleteDate(String),
    MissingArgument(String),
    MalformedArgument(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidDate(d) => write!(f, "Invalid date: {}", d),
            ValidationError::IncompleteDate(d) => {
                write!(f, "Incomplete date, expected DD/MM/YYYY: {}", d)
            }
            ValidationError::MissingArgument(a) => write!(f, "Missing argument: {}", a),
            ValidationError::MalformedArgument(a) => write!(f, "Malformed argument: {}", a),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Session-level errors raised while serving a connection
#[derive(Debug)]
pub enum SessionError {
    LineTooLong(usize),
    RateLimited(SocketAddr),
    TooManyClients(usize),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::LineTooLong(len) => write!(f, "Line too long: {} bytes", len),
            SessionError::RateLimited(addr) => write!(f, "Rate limit exceeded for {}", addr),
            SessionError::TooManyClients(max) => {
                write!(f, "Too many connections (max {})", max)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// General service error that encompasses all error types
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    Session(SessionError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(e) => write!(f, "Validation error: {}", e),
            ServiceError::Session(e) => write!(f, "Session error: {}", e),
            ServiceError::Config(e) => write!(f, "Configuration error: {}", e),
            ServiceError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<ValidationError> for ServiceError {
    fn from(error: ValidationError) -> Self {
        ServiceError::Validation(error)
    }
}

impl From<SessionError> for ServiceError {
    fn from(error: SessionError) -> Self {
        ServiceError::Session(error)
    }
}

impl From<config::ConfigError> for ServiceError {
    fn from(error: config::ConfigError) -> Self {
        ServiceError::Config(error)
    }
}

impl From<io::Error> for ServiceError {
    fn from(error: io::Error) -> Self {
        ServiceError::IoError(error)
    }
}
