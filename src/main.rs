//! Wellness Validator - Entry Point
//!
//! Serves the signup form validators over a line protocol.

use log::info;
use std::process::ExitCode;

use wellness_validator::error::ServiceError;
use wellness_validator::error::handlers::handle_error;
use wellness_validator::{Server, ServiceConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching validation service...");

    let config = match ServiceConfig::load() {
        Ok(config) => config,
        Err(e) => {
            handle_error(&ServiceError::from(e));
            return ExitCode::FAILURE;
        }
    };

    match Server::bind(config).await {
        Ok(server) => {
            server.start().await;
            ExitCode::SUCCESS
        }
        Err(e) => {
            handle_error(&e);
            ExitCode::FAILURE
        }
    }
}
