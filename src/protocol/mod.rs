//! Validation line protocol
//!
//! Handles command parsing, dispatch to the validators, and reply formatting.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::handle_command;
