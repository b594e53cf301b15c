//! Session registry
//!
//! Tracks the sessions of currently connected clients.

use crate::client::Session;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Registry for tracking active sessions
pub struct SessionRegistry {
    sessions: HashMap<SocketAddr, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    pub fn insert(&mut self, addr: SocketAddr, session: Session) {
        self.sessions.insert(addr, session);
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> Option<Session> {
        self.sessions.remove(addr)
    }

    pub fn get(&self, addr: &SocketAddr) -> Option<&Session> {
        self.sessions.get(addr)
    }

    pub fn get_mut(&mut self, addr: &SocketAddr) -> Option<&mut Session> {
        self.sessions.get_mut(addr)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
