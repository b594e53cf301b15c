//! Module `commands`
//!
//! Defines the command parsing logic for the validation line protocol and the
//! data structures used to represent commands, their status, and results.

use std::fmt;

/// Represents a command parsed from one line of client input.
///
/// Commands that take an argument carry the rest of the line, trimmed.
/// `Password` is the exception: it keeps every byte after the separator.
#[derive(Debug, PartialEq)]
pub enum Command {
    Email(String),    // Check email syntax
    Profile(String),  // Set name/email used by PASSWORD
    Password(String), // Check password strength
    Phone(String),    // Normalize a phone number
    Age(String),      // Age eligibility: <dob> [min]
    Dob(String),      // Masked DD/MM/YYYY entry to ISO date
    Sanitize(String), // Strip script blocks and angle brackets
    Reset,
    Noop,
    Quit,
    MissingArgument(String), // Known verb without its required argument
    Unknown(String),
}

impl Command {
    /// Rendering for log output; never includes password text.
    pub fn log_label(&self) -> String {
        match self {
            Command::Password(_) => "PASSWORD ****".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Email(arg) => write!(f, "EMAIL {}", arg),
            Command::Profile(arg) => write!(f, "PROFILE {}", arg),
            Command::Password(_) => write!(f, "PASSWORD"),
            Command::Phone(arg) => write!(f, "PHONE {}", arg),
            Command::Age(arg) => write!(f, "AGE {}", arg),
            Command::Dob(arg) => write!(f, "DOB {}", arg),
            Command::Sanitize(arg) => write!(f, "SANITIZE {}", arg),
            Command::Reset => write!(f, "RESET"),
            Command::Noop => write!(f, "NOOP"),
            Command::Quit => write!(f, "QUIT"),
            Command::MissingArgument(verb) => write!(f, "{} <missing argument>", verb),
            Command::Unknown(raw) => write!(f, "UNKNOWN {}", raw),
        }
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

/// Parses a raw line received from a client into the `Command` enum.
///
/// Verbs are case-insensitive. Known verbs used without their required
/// argument parse to `MissingArgument`. Only the line terminator and the
/// single separator after the verb are stripped from a password.
pub fn parse_command(raw: &str) -> Command {
    let line = raw.trim_end_matches(['\r', '\n']).trim_start();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let cmd = verb.to_ascii_uppercase();
    let arg = rest.trim();

    let with_arg = |build: fn(String) -> Command| {
        if arg.is_empty() {
            Command::MissingArgument(cmd.clone())
        } else {
            build(arg.to_string())
        }
    };

    match cmd.as_str() {
        "EMAIL" => with_arg(Command::Email),
        "PROFILE" => with_arg(Command::Profile),
        "PASSWORD" | "PASS" if rest.is_empty() => Command::MissingArgument(cmd.clone()),
        "PASSWORD" | "PASS" => Command::Password(rest.to_string()),
        "PHONE" => with_arg(Command::Phone),
        "AGE" => with_arg(Command::Age),
        "DOB" => with_arg(Command::Dob),
        "SANITIZE" => with_arg(Command::Sanitize),
        "RESET" => Command::Reset,
        "NOOP" => Command::Noop,
        "QUIT" | "Q" => Command::Quit,
        _ => Command::Unknown(line.trim_end().to_string()),
    }
}
