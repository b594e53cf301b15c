//! Registration and login form checks
//!
//! Runs every field validator and collects inline errors keyed by field.
//! Each field reports at most one error.

use chrono::{Local, NaiveDate};
use log::debug;

use super::results::{Field, FieldErrors, Login, Registration};
use crate::config::FormPolicy;
use crate::validation::age::{is_at_least_age_on, parse_dob};
use crate::validation::phone::digit_count;
use crate::validation::{
    PasswordViolation, UserInfo, normalize_phone_number, sanitize_string, validate_email,
};

/// Raw signup form input
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    /// Dialling prefix such as `+44`; may be empty
    pub country_code: String,
    /// ISO date or timestamp
    pub dob: String,
}

/// Raw login form input
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Validates a signup form against today's date.
pub fn validate_registration(
    form: &RegistrationForm,
    policy: &FormPolicy,
) -> Result<Registration, FieldErrors> {
    validate_registration_on(form, policy, Local::now().date_naive())
}

/// Validates a signup form with an explicit reference date for the age check.
pub fn validate_registration_on(
    form: &RegistrationForm,
    policy: &FormPolicy,
    today: NaiveDate,
) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::default();

    let first_name = sanitize_string(form.first_name.trim());
    let last_name = sanitize_string(form.last_name.trim());
    if first_name.is_empty() {
        errors.add(Field::FirstName, "First name is required");
    }
    if last_name.is_empty() {
        errors.add(Field::LastName, "Last name is required");
    }

    let email = form.email.trim().to_lowercase();
    check_email(&email, &mut errors);

    let user_info = UserInfo {
        first_name: Some(first_name.clone()),
        last_name: Some(last_name.clone()),
        email: Some(email.clone()),
    };
    let check = policy.password.check(&form.password, Some(&user_info));
    if let Some(message) = check.message {
        errors.add(Field::Password, message);
    }
    if form.password != form.confirm_password {
        errors.add(Field::ConfirmPassword, "Passwords do not match");
    }

    let phone = normalize_phone_number(&form.phone);
    if digit_count(&phone) == 0 {
        errors.add(Field::Phone, "Phone number is required");
    } else if digit_count(&phone) > policy.max_phone_digits {
        errors.add(Field::Phone, "Phone number is too long");
    }

    let dob = if form.dob.trim().is_empty() {
        errors.add(Field::Dob, "Date of birth is required");
        None
    } else {
        match parse_dob(&form.dob) {
            Ok(dob) if is_at_least_age_on(dob, policy.min_age, today) => Some(dob),
            Ok(_) => {
                errors.add(
                    Field::Dob,
                    format!("You must be at least {} years old", policy.min_age),
                );
                None
            }
            Err(e) => {
                debug!("Rejected date of birth: {}", e);
                errors.add(Field::Dob, "Enter a valid date of birth");
                None
            }
        }
    };

    match dob {
        Some(dob) if errors.is_empty() => Ok(Registration {
            first_name,
            last_name,
            email,
            phone: join_phone(&form.country_code, &phone),
            dob,
        }),
        _ => Err(errors),
    }
}

/// Validates a login form: presence checks and minimum password length only.
pub fn validate_login(form: &LoginForm, policy: &FormPolicy) -> Result<Login, FieldErrors> {
    let mut errors = FieldErrors::default();

    let email = form.email.trim().to_lowercase();
    if email.is_empty() {
        errors.add(Field::Email, "Email is required");
    }

    if form.password.is_empty() {
        errors.add(Field::Password, PasswordViolation::Required.to_string());
    } else {
        let actual = form.password.chars().count();
        let min = policy.password.min_length;
        if actual < min {
            errors.add(
                Field::Password,
                PasswordViolation::TooShort { min, actual }.to_string(),
            );
        }
    }

    if errors.is_empty() {
        Ok(Login { email })
    } else {
        Err(errors)
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.is_empty() {
        errors.add(Field::Email, "Email is required");
    } else if !validate_email(email) {
        errors.add(Field::Email, "Enter a valid email address");
    }
}

fn join_phone(country_code: &str, phone: &str) -> String {
    let code = normalize_phone_number(country_code);
    if code.is_empty() || phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("{} {}", code, phone)
    }
}
