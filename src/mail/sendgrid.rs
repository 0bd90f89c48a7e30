//! SendGrid provider: v3 Web API `POST /v3/mail/send`.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::{MailProvider, OutboundEmail};
use crate::error::DeliveryError;

/// Upper bound on a single send call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const PROVIDER: &str = "sendgrid";

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    reply_to: Address<'a>,
    subject: &'a str,
    /// SendGrid requires text/plain before text/html.
    content: Vec<Content<'a>>,
}

impl<'a> From<&'a OutboundEmail> for SendRequest<'a> {
    fn from(email: &'a OutboundEmail) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![Address { email: &email.to }],
            }],
            from: Address { email: &email.from },
            reply_to: Address {
                email: &email.reply_to,
            },
            subject: &email.subject,
            content: vec![
                Content {
                    kind: "text/plain",
                    value: &email.text,
                },
                Content {
                    kind: "text/html",
                    value: &email.html,
                },
            ],
        }
    }
}

// ── Provider ────────────────────────────────────────────────────────

/// Sends mail through the SendGrid HTTP API.
pub struct SendGridProvider {
    api_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl SendGridProvider {
    pub fn new(api_url: &str, api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    fn send_url(&self) -> String {
        format!("{}/v3/mail/send", self.api_url)
    }
}

#[async_trait]
impl MailProvider for SendGridProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        let resp = self
            .client
            .post(self.send_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&SendRequest::from(email))
            .send()
            .await
            .map_err(|e| DeliveryError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "SendGrid accepted message");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        if status.is_client_error() {
            Err(DeliveryError::Rejected {
                provider: PROVIDER.into(),
                status: status.as_u16(),
                body,
            })
        } else {
            Err(DeliveryError::RequestFailed {
                provider: PROVIDER.into(),
                reason: format!("HTTP {status}: {body}"),
            })
        }
    }
}
