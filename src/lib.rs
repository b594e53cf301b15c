pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod registration;
pub mod server;
pub mod validation;

pub use config::ServiceConfig;
pub use server::Server;
pub use validation::{
    PasswordCheck, UserInfo, is_at_least_age, normalize_phone_number, sanitize_string,
    validate_email, validate_password,
};
