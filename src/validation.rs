//! Field validators shared by the request types.
//!
//! The request structs derive `validator::Validate` and point their fields at the
//! functions and patterns in this module. `validator` reports failures as an unordered
//! map, so `first_message` picks the failure to report by walking the fields in the
//! order the caller lists them.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 128;

lazy_static! {
    pub static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Lower-cases and trims an email. This is the uniqueness key for users.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Display names are 2-100 characters. Callers pass the trimmed value.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.chars().count();
    if chars < NAME_MIN_CHARS {
        return Err(failure("name_too_short", "Name must be at least 2 characters long"));
    }
    if chars > NAME_MAX_CHARS {
        return Err(failure("name_too_long", "Name must be less than 100 characters"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let chars = password.chars().count();
    if chars < PASSWORD_MIN_CHARS {
        return Err(failure(
            "password_too_short",
            "Password must be at least 6 characters long",
        ));
    }
    if chars > PASSWORD_MAX_CHARS {
        return Err(failure(
            "password_too_long",
            "Password must be less than 128 characters",
        ));
    }
    Ok(())
}

/// Returns the message of the first failing field, checking `order` first and then
/// any remaining fields alphabetically.
pub fn first_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let fields = errors.field_errors();
    let ordered = order.iter().filter_map(|field| fields.get(*field));

    let mut rest: Vec<_> = fields
        .iter()
        .filter(|(field, _)| !order.contains(*field))
        .collect();
    rest.sort_by_key(|(field, _)| **field);

    ordered
        .chain(rest.into_iter().map(|(_, errs)| errs))
        .flat_map(|errs| errs.iter())
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value ({})", error.code),
        })
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}
