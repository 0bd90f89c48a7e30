//! SMTP provider: authenticated relay via lettre.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};

use super::{MailProvider, OutboundEmail};
use crate::error::DeliveryError;

const PROVIDER: &str = "smtp";

/// Port reserved for TLS from the first byte (RFC 8314).
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// TLS handshake immediately on connect.
    Implicit,
    /// Plain connect, then upgrade with `STARTTLS`.
    StartTls,
}

impl TlsMode {
    /// 465 wraps the whole session in TLS; submission ports (587, 25, 2525)
    /// upgrade with STARTTLS.
    pub fn for_port(port: u16) -> Self {
        if port == IMPLICIT_TLS_PORT {
            Self::Implicit
        } else {
            Self::StartTls
        }
    }
}

/// Sends mail through an SMTP relay (STARTTLS/TLS via rustls).
pub struct SmtpProvider {
    host: String,
    port: u16,
    username: String,
    password: SecretString,
}

impl SmtpProvider {
    pub fn new(host: &str, port: u16, username: &str, password: SecretString) -> Self {
        Self {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password,
        }
    }

    fn transport(&self) -> Result<SmtpTransport, DeliveryError> {
        let creds = Credentials::new(
            self.username.clone(),
            self.password.expose_secret().to_string(),
        );
        let builder = match TlsMode::for_port(self.port) {
            TlsMode::Implicit => SmtpTransport::relay(&self.host),
            TlsMode::StartTls => SmtpTransport::starttls_relay(&self.host),
        };
        Ok(builder
            .map_err(|e| DeliveryError::RequestFailed {
                provider: PROVIDER.into(),
                reason: format!("SMTP relay error: {e}"),
            })?
            .port(self.port)
            .credentials(creds)
            .build())
    }
}

fn mailbox(field: &str, value: &str) -> Result<Mailbox, DeliveryError> {
    value.parse().map_err(|e| DeliveryError::InvalidAddress {
        field: field.to_string(),
        reason: format!("{e}"),
    })
}

/// Build the MIME message: multipart/alternative with text and HTML parts.
pub fn build_message(email: &OutboundEmail) -> Result<Message, DeliveryError> {
    Message::builder()
        .from(mailbox("from", &email.from)?)
        .reply_to(mailbox("reply-to", &email.reply_to)?)
        .to(mailbox("to", &email.to)?)
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))
        .map_err(|e| DeliveryError::RequestFailed {
            provider: PROVIDER.into(),
            reason: format!("Failed to build email: {e}"),
        })
}

#[async_trait]
impl MailProvider for SmtpProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        let message = build_message(email)?;
        let transport = self.transport()?;

        let result = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| DeliveryError::RequestFailed {
                provider: PROVIDER.into(),
                reason: format!("SMTP send task panicked: {e}"),
            })?;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.is_permanent() => Err(DeliveryError::Rejected {
                provider: PROVIDER.into(),
                status: e
                    .status()
                    .and_then(|code| code.to_string().parse().ok())
                    .unwrap_or(0),
                body: e.to_string(),
            }),
            Err(e) => Err(DeliveryError::RequestFailed {
                provider: PROVIDER.into(),
                reason: format!("SMTP send failed: {e}"),
            }),
        }
    }
}
