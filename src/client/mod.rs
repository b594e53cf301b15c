//! Client session management
//!
//! Handles per-connection state, the session registry, and the command loop.

pub mod handler;
pub mod registry;
pub mod state;

pub use handler::handle_client;
pub use registry::SessionRegistry;
pub use state::Session;
