//! Module `state`
//!
//! Defines the `Session` struct holding per-connection protocol state.

use std::net::SocketAddr;

use crate::validation::UserInfo;

/// State of one connected client.
///
/// Tracks the identity set with PROFILE, which PASSWORD checks against.
#[derive(Debug, Default)]
pub struct Session {
    client_addr: Option<SocketAddr>,
    user_info: UserInfo,
    commands_handled: u64,
}

impl Session {
    pub fn new(client_addr: SocketAddr) -> Self {
        Self {
            client_addr: Some(client_addr),
            ..Default::default()
        }
    }

    /// Clears the stored identity. The command counter is kept.
    pub fn reset(&mut self) {
        self.user_info = UserInfo::default();
    }

    pub fn record_command(&mut self) {
        self.commands_handled += 1;
    }

    pub fn client_addr(&self) -> Option<SocketAddr> {
        self.client_addr
    }

    pub fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    pub fn commands_handled(&self) -> u64 {
        self.commands_handled
    }

    pub fn set_user_info(&mut self, user_info: UserInfo) {
        self.user_info = user_info;
    }
}
