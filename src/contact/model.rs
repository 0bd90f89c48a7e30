//! Contact form data model.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Generic success text. Also returned for honeypot hits.
pub const MSG_SENT: &str = "Message sent successfully";
pub const MSG_MISSING_FIELDS: &str = "Missing required fields";
pub const MSG_INVALID_EMAIL: &str = "Invalid email address";
pub const MSG_SHORT_NAME: &str = "Name must be at least 2 characters";
pub const MSG_SHORT_MESSAGE: &str = "Message must be at least 10 characters";
pub const MSG_NOT_CONFIGURED: &str = "Email service is not configured";
pub const MSG_SEND_FAILED: &str = "Failed to send message. Please try again later.";
pub const MSG_INVALID_BODY: &str = "Invalid request body";

/// A contact form submission as posted by the site's form.
///
/// Missing keys deserialize as empty strings so that an incomplete body
/// lands in validation rather than failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub message: String,
    /// Honeypot trap field. Hidden from humans; only form-filling bots set it.
    #[serde(rename = "website")]
    pub honeypot: String,
}

impl ContactSubmission {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            company: None,
            message: message.to_string(),
            honeypot: String::new(),
        }
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }

    pub fn with_honeypot(mut self, value: &str) -> Self {
        self.honeypot = value.to_string();
        self
    }

    /// The company, if present and not blank.
    pub fn company(&self) -> Option<&str> {
        self.company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Why a submission failed a field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    MissingFields,
    InvalidName,
    InvalidEmail,
    InvalidMessage,
}

impl ValidationFailure {
    /// Message returned by the contact endpoint.
    pub fn response_message(&self) -> &'static str {
        match self {
            Self::MissingFields => MSG_MISSING_FIELDS,
            Self::InvalidName => MSG_SHORT_NAME,
            Self::InvalidEmail => MSG_INVALID_EMAIL,
            Self::InvalidMessage => MSG_SHORT_MESSAGE,
        }
    }

    /// Inline message shown next to the offending form field. The form only
    /// has per-field hints, so `MissingFields` has none.
    pub fn form_message(&self) -> Option<&'static str> {
        match self {
            Self::MissingFields => None,
            Self::InvalidName => Some(MSG_SHORT_NAME),
            Self::InvalidEmail => Some("Please enter a valid email address"),
            Self::InvalidMessage => Some(MSG_SHORT_MESSAGE),
        }
    }
}

/// Result of classifying a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Valid,
    /// Honeypot was filled. Treated as success towards the caller.
    Automated,
    Invalid(ValidationFailure),
}

/// What happened to a dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Rejected(String),
    ProviderError(String),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// JSON body returned by the contact endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub message: String,
}

/// Caller-facing response: a status plus one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactResponse {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ContactResponse {
    pub fn sent() -> Self {
        Self {
            status: StatusCode::OK,
            message: MSG_SENT,
        }
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    pub fn server_error(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    pub fn body(&self) -> ResponseBody {
        ResponseBody {
            message: self.message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn website_key_maps_to_honeypot() {
        let sub: ContactSubmission = serde_json::from_value(serde_json::json!({
            "name": "Ana",
            "email": "ana@example.com",
            "message": "Hello there, world",
            "website": "http://spam.example"
        }))
        .unwrap();
        assert_eq!(sub.honeypot, "http://spam.example");
        assert_eq!(sub.company, None);
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let sub: ContactSubmission = serde_json::from_str("{}").unwrap();
        assert_eq!(sub, ContactSubmission::default());
    }

    #[test]
    fn blank_company_is_treated_as_absent() {
        let sub = ContactSubmission::new("Ana", "ana@example.com", "Hi").with_company("   ");
        assert_eq!(sub.company(), None);
        let sub = sub.with_company(" Acme ");
        assert_eq!(sub.company(), Some("Acme"));
    }

    #[test]
    fn response_body_serializes_message_only() {
        let json = serde_json::to_value(ContactResponse::sent().body()).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Message sent successfully" }));
    }
}
