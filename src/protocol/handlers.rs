//! Command handlers module for the validation service.
//!
//! Each handler runs one validator against the command argument and turns the
//! outcome into a reply line. Only PROFILE, PASSWORD and RESET touch the
//! session.

use crate::client::Session;
use crate::config::FormPolicy;
use crate::error::ValidationError;
use crate::protocol::responses::{self, format_response};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::validation::age::is_at_least_age_on;
use crate::validation::{
    UserInfo, normalize_phone_number, parse_dob, parse_dob_entry, sanitize_string,
    validate_email,
};
use chrono::Local;
use log::debug;

/// Dispatches a received command to its corresponding handler.
///
/// # Arguments
///
/// * `session` - Mutable reference to the session that sent the command.
/// * `command` - Reference to the parsed command.
/// * `policy` - Password and form limits from the service configuration.
///
/// # Returns
///
/// * `CommandResult` - Result of the command execution, including status and message.
pub fn handle_command(
    session: &mut Session,
    command: &Command,
    policy: &FormPolicy,
) -> CommandResult {
    session.record_command();

    match command {
        Command::Email(email) => handle_cmd_email(email),
        Command::Profile(args) => handle_cmd_profile(session, args),
        Command::Password(password) => handle_cmd_password(session, password, policy),
        Command::Phone(phone) => handle_cmd_phone(phone),
        Command::Age(args) => handle_cmd_age(args, policy),
        Command::Dob(entry) => handle_cmd_dob(entry),
        Command::Sanitize(text) => handle_cmd_sanitize(text),
        Command::Reset => handle_cmd_reset(session),
        Command::Noop => success(responses::OK, "OK"),
        Command::Quit => handle_cmd_quit(session),
        Command::MissingArgument(verb) => {
            failure(ValidationError::MissingArgument(verb.clone()))
        }
        Command::Unknown(_) => CommandResult {
            status: CommandStatus::Failure("Unknown command".into()),
            message: Some(format_response(responses::SYNTAX_ERROR, "Unknown command")),
        },
    }
}

fn success(code: u16, text: &str) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_response(code, text)),
    }
}

fn rejected(code: u16, text: &str) -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure(text.to_string()),
        message: Some(format_response(code, text)),
    }
}

fn failure(err: ValidationError) -> CommandResult {
    let text = err.to_string();
    CommandResult {
        message: Some(format_response(responses::SYNTAX_ERROR_IN_ARGUMENT, &text)),
        status: CommandStatus::Failure(text),
    }
}

fn handle_cmd_email(email: &str) -> CommandResult {
    if validate_email(email) {
        success(responses::ACCEPTED, "Email accepted")
    } else {
        rejected(responses::INVALID_EMAIL, "Invalid email address")
    }
}

/// Handles PROFILE: replaces the session identity with the given
/// `first=`, `last=` and `email=` pairs.
fn handle_cmd_profile(session: &mut Session, args: &str) -> CommandResult {
    match parse_profile(args) {
        Ok(info) => {
            session.set_user_info(info);
            success(responses::OK, "Profile set")
        }
        Err(e) => failure(e),
    }
}

/// Parses whitespace-separated `key=value` pairs. Keys are case-insensitive.
pub fn parse_profile(args: &str) -> Result<UserInfo, ValidationError> {
    let mut info = UserInfo::default();

    for pair in args.split_whitespace() {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| ValidationError::MalformedArgument(pair.to_string()))?;
        let value = Some(value.to_string());

        match key.to_ascii_lowercase().as_str() {
            "first" => info.first_name = value,
            "last" => info.last_name = value,
            "email" => info.email = value,
            _ => return Err(ValidationError::MalformedArgument(pair.to_string())),
        }
    }

    Ok(info)
}

fn handle_cmd_password(session: &Session, password: &str, policy: &FormPolicy) -> CommandResult {
    let check = policy.password.check(password, Some(session.user_info()));

    match check.message {
        None => success(responses::ACCEPTED, "Password accepted"),
        Some(message) => {
            debug!("Password rejected with {} violation(s)", check.violations.len());
            rejected(responses::WEAK_PASSWORD, &message)
        }
    }
}

fn handle_cmd_phone(phone: &str) -> CommandResult {
    success(responses::ACCEPTED, &normalize_phone_number(phone))
}

/// Handles AGE `<dob> [min]`; `min` defaults to the registration minimum.
fn handle_cmd_age(args: &str, policy: &FormPolicy) -> CommandResult {
    let mut parts = args.split_whitespace();
    let dob = parts.next().unwrap_or_default();

    let min_age = match parts.next() {
        None => policy.min_age,
        Some(raw) => match raw.parse::<u32>() {
            Ok(min) => min,
            Err(_) => return failure(ValidationError::MalformedArgument(raw.to_string())),
        },
    };
    if let Some(extra) = parts.next() {
        return failure(ValidationError::MalformedArgument(extra.to_string()));
    }

    let date = match parse_dob(dob) {
        Ok(date) => date,
        Err(e) => return failure(e),
    };

    if is_at_least_age_on(date, min_age, Local::now().date_naive()) {
        success(responses::ACCEPTED, "Age requirement met")
    } else {
        rejected(responses::AGE_NOT_MET, "Minimum age not met")
    }
}

fn handle_cmd_dob(entry: &str) -> CommandResult {
    match parse_dob_entry(entry) {
        Ok(date) => success(responses::ACCEPTED, &date.format("%Y-%m-%d").to_string()),
        Err(e) => failure(e),
    }
}

fn handle_cmd_sanitize(text: &str) -> CommandResult {
    success(responses::ACCEPTED, &sanitize_string(text))
}

fn handle_cmd_reset(session: &mut Session) -> CommandResult {
    session.reset();
    success(responses::OK, "Session reset")
}

fn handle_cmd_quit(session: &mut Session) -> CommandResult {
    session.reset();

    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(responses::CLOSING, "Goodbye")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_command;

    fn run(session: &mut Session, line: &str) -> String {
        let result = handle_command(session, &parse_command(line), &FormPolicy::default());
        result.message.unwrap_or_default()
    }

    #[test]
    fn test_email_replies() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, "EMAIL test@example.com"), "250 Email accepted\r\n");
        assert_eq!(run(&mut session, "EMAIL user@"), "551 Invalid email address\r\n");
    }

    #[test]
    fn test_password_uses_profile() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, "PASSWORD HelloZube1!"), "250 Password accepted\r\n");
        assert_eq!(run(&mut session, "PROFILE first=Zube"), "200 Profile set\r\n");
        assert_eq!(
            run(&mut session, "PASSWORD HelloZube1!"),
            "552 Password cannot contain your name or part of your email\r\n"
        );
        assert_eq!(run(&mut session, "RESET"), "200 Session reset\r\n");
        assert_eq!(run(&mut session, "PASSWORD HelloZube1!"), "250 Password accepted\r\n");
    }

    #[test]
    fn test_weak_password_reply() {
        let mut session = Session::default();
        assert_eq!(
            run(&mut session, "PASSWORD Sh1!"),
            "552 Password must be at least 8 characters\r\n"
        );
    }

    #[test]
    fn test_password_padding_is_checked() {
        let mut session = Session::default();
        assert_eq!(
            run(&mut session, "PASSWORD  Secure1!x "),
            "552 Password cannot contain spaces\r\n"
        );
        assert_eq!(run(&mut session, "PASSWORD Secure1!x"), "250 Password accepted\r\n");
    }

    #[test]
    fn test_profile_parsing() {
        let info = parse_profile("FIRST=Ada last=Okafor email=ada@example.com").unwrap();
        assert_eq!(info.first_name.as_deref(), Some("Ada"));
        assert_eq!(info.last_name.as_deref(), Some("Okafor"));
        assert_eq!(info.email.as_deref(), Some("ada@example.com"));

        assert_eq!(
            parse_profile("nickname=ada"),
            Err(ValidationError::MalformedArgument("nickname=ada".into()))
        );
        assert_eq!(
            parse_profile("ada"),
            Err(ValidationError::MalformedArgument("ada".into()))
        );
    }

    #[test]
    fn test_age_replies() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, "AGE 1990-01-01"), "250 Age requirement met\r\n");
        assert_eq!(run(&mut session, "AGE 1990-01-01 200"), "553 Minimum age not met\r\n");
        assert_eq!(
            run(&mut session, "AGE yesterday"),
            "501 Invalid date: yesterday\r\n"
        );
        assert_eq!(
            run(&mut session, "AGE 1990-01-01 old"),
            "501 Malformed argument: old\r\n"
        );
    }

    #[test]
    fn test_transform_replies() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, "PHONE +1-555 123-4567"), "250 +15551234567\r\n");
        assert_eq!(run(&mut session, "DOB 07/03/1995"), "250 1995-03-07\r\n");
        assert_eq!(
            run(&mut session, "SANITIZE Hello <script>alert(1)</script> World"),
            "250 Hello  World\r\n"
        );
    }

    #[test]
    fn test_missing_and_unknown() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, "EMAIL"), "501 Missing argument: EMAIL\r\n");
        assert_eq!(run(&mut session, "LIST"), "500 Unknown command\r\n");
    }

    #[test]
    fn test_quit_closes() {
        let mut session = Session::default();
        let result = handle_command(&mut session, &Command::Quit, &FormPolicy::default());
        assert_eq!(result.status, CommandStatus::CloseConnection);
        assert_eq!(result.message.as_deref(), Some("221 Goodbye\r\n"));
        assert_eq!(session.commands_handled(), 1);
    }
}
