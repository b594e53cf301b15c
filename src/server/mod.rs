//! Server core functionality
//!
//! This module contains the listener and the accept loop for the validation
//! service.

pub mod core;

pub use self::core::Server;
