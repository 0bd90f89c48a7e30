//! Submission rules.
//!
//! Two entry points share one set of field rules:
//! - [`validate_form`] is the advisory check the form runs for inline
//!   feedback. It reports the first failing field in form order and knows
//!   nothing about the honeypot.
//! - [`classify`] is the authoritative gate run by the endpoint for every
//!   request, whatever the form claimed.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::model::{Classification, ContactSubmission, ValidationFailure};

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_MESSAGE_CHARS: usize = 10;

/// `local@domain.tld`: no whitespace, one `@`, a `.` somewhere after it.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Length in characters, counted on the value exactly as submitted so the
/// server agrees with the form on where the limit sits.
fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn is_valid_name(name: &str) -> bool {
    char_len(name) >= MIN_NAME_CHARS
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

pub fn is_valid_message(message: &str) -> bool {
    char_len(message) >= MIN_MESSAGE_CHARS
}

/// Advisory form check: first failure in field order.
pub fn validate_form(submission: &ContactSubmission) -> Result<(), ValidationFailure> {
    if !is_valid_name(&submission.name) {
        return Err(ValidationFailure::InvalidName);
    }
    if !is_valid_email(&submission.email) {
        return Err(ValidationFailure::InvalidEmail);
    }
    if !is_valid_message(&submission.message) {
        return Err(ValidationFailure::InvalidMessage);
    }
    Ok(())
}

/// Whether the raw request body trips the honeypot.
///
/// Runs before the body is typed, so a bot that also sends odd field types
/// still gets the quiet success. Any truthy `website` value counts: a
/// non-empty string, `true`, a non-zero number, an array or an object.
pub fn honeypot_filled(body: &Value) -> bool {
    match body.get("website") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Authoritative classification of a submission.
///
/// The honeypot is checked before anything else so a bot never learns which
/// field rule it would have tripped.
pub fn classify(submission: &ContactSubmission) -> Classification {
    if !submission.honeypot.is_empty() {
        return Classification::Automated;
    }

    let missing = [&submission.name, &submission.email, &submission.message]
        .iter()
        .any(|field| field.trim().is_empty());
    if missing {
        return Classification::Invalid(ValidationFailure::MissingFields);
    }

    match validate_form(submission) {
        Ok(()) => Classification::Valid,
        Err(failure) => Classification::Invalid(failure),
    }
}
