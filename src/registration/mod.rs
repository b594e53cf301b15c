//! Registration and login forms
//!
//! Combines the field validators into whole-form checks for the signup and
//! login screens.

pub mod form;
pub mod results;

pub use form::{
    LoginForm, RegistrationForm, validate_login, validate_registration, validate_registration_on,
};
pub use results::{Field, FieldErrors, Login, Registration};
