//! Logging middleware
//!
//! Provides connection and command logging.

use log::info;
use std::net::SocketAddr;

use crate::protocol::Command;

/// Log a client connection
pub fn log_connection(client_addr: &SocketAddr, active: usize, max: usize) {
    info!("Client connected: {} ({}/{} clients)", client_addr, active, max);
}

/// Log a client command with its argument redacted where needed
pub fn log_command(client_addr: &SocketAddr, command: &Command) {
    info!("Client {} executed: {}", client_addr, command.log_label());
}

/// Log a client disconnect
pub fn log_disconnect(client_addr: &SocketAddr, commands_handled: u64) {
    info!(
        "Client {} disconnected after {} command(s)",
        client_addr, commands_handled
    );
}
